use schemars::schema_for;

use crate::json::types;

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonPickupPlanRequest))
}

#[cfg(test)]
mod tests {
    use super::generate_json_schema;

    #[test]
    fn test_schema_names_the_request() {
        let schema = generate_json_schema().unwrap();

        assert!(schema.contains("PickupPlanRequest"));
        assert!(schema.contains("FarmerLocation"));
    }
}
