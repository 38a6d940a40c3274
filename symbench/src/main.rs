fn main() -> anyhow::Result<()> {
    symbench::run()
}
