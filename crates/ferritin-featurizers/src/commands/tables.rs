use anyhow::Context;
use ferritin_msa::ReferenceTables;

pub fn execute(output: String) -> anyhow::Result<()> {
    let json = ReferenceTables::default().to_json()?;
    std::fs::write(&output, json).with_context(|| format!("writing {output}"))?;
    log::info!("wrote reference tables to {output}");
    Ok(())
}
