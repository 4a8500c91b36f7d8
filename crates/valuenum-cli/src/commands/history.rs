use super::{load_config, open_database};

pub fn run(limit: Option<usize>, caller: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let db = open_database(&config)?;
    let limit = config.history.page_limit(limit);

    let records = match caller {
        Some(caller) => db.calculation_history(&caller, limit)?,
        None => db.recent_calculations(limit)?,
    };
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

pub fn show(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let db = open_database(&config)?;

    match db.get_calculation(id)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => Err(format!("calculation not found: {id}").into()),
    }
}
