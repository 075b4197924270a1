/// Free-text details the operator enters about the machining operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperatorMetadata {
    pub name: String,
    pub operation: String,
    pub material: String,
    pub date: String,
    pub tool: String,
    pub cutting_speed: String,
}

impl OperatorMetadata {
    /// Labels of fields left blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("Name", &self.name),
            ("Operation", &self.operation),
            ("Material", &self.material),
            ("Date", &self.date),
            ("Tool", &self.tool),
            ("Cutting speed", &self.cutting_speed),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Final report of a session: operator metadata plus how many alerts fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub metadata: OperatorMetadata,
    pub alert_count: u32,
}

impl SessionSummary {
    pub fn new(metadata: OperatorMetadata, alert_count: u32) -> Self {
        Self {
            metadata,
            alert_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_blank_entries_in_order() {
        let metadata = OperatorMetadata {
            name: "Ana".to_string(),
            operation: "  ".to_string(),
            material: "steel".to_string(),
            ..Default::default()
        };

        assert_eq!(
            metadata.missing_fields(),
            vec!["Operation", "Date", "Tool", "Cutting speed"]
        );
        assert!(!metadata.is_complete());
    }
}
