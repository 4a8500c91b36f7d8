use super::{load_config, open_database};

pub fn run(limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let db = open_database(&config)?;
    let leads = db.list_concept_access(limit)?;
    println!("{}", serde_json::to_string_pretty(&leads)?);
    Ok(())
}
