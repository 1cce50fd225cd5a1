//! Hash command implementation.

use tender_core::content_hash;

pub fn run(file: String) -> Result<(), Box<dyn std::error::Error>> {
    let bytes =
        std::fs::read(&file).map_err(|e| format!("Failed to read document `{}`: {}", file, e))?;
    println!("{}", content_hash(&bytes));
    Ok(())
}
