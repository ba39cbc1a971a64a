fn main() -> anyhow::Result<()> {
    sciloc::cli::run_cli()
}
