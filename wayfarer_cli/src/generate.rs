use std::path::PathBuf;

use clap::Subcommand;
use schemars::schema_for;

use crate::input::ItineraryInput;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    JsonSchema {
        /// Output file of the itinerary input schema
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(ItineraryInput))
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = generate_json_schema()?;

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(out, schema)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_itinerary() {
        let schema: serde_json::Value = serde_json::from_str(&generate_json_schema().unwrap()).unwrap();

        assert!(schema["properties"]["waypoints"].is_object());
        assert!(schema["properties"]["baselineDistance"].is_object());
        assert_eq!(schema["required"], serde_json::json!(["waypoints"]));
    }
}
