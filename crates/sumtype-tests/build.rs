fn main() -> Result<(), Box<dyn std::error::Error>> {
    sumtype_gen::Builder::new()
        .files(["decls/shapes.rs", "decls/outcomes.rs"])
        .fail_on_diagnostics(true)
        .compile()?;
    Ok(())
}
