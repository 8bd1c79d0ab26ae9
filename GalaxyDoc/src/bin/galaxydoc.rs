fn main() -> anyhow::Result<()> {
    galaxydoc::cli::run_cli()
}
