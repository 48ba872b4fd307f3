use super::OutputWriter;
use crate::analysis::RoiReport;
use std::io::Write;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrganizationType, Product};
    use crate::output::test_support::report;
    use serde_json::Value;

    #[test]
    fn json_carries_summary_and_analyses() {
        let report = report(Product::PraediAlert, OrganizationType::Visn21);
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_report(&report).unwrap();

        let value: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["results"]["product"], "praedialert");
        assert_eq!(value["results"]["summary"]["total_savings"], 5_154_200.0);
        assert_eq!(value["projection"].as_array().unwrap().len(), 5);
        assert_eq!(value["scenarios"][0]["name"], "Conservative");
        assert!(value["contract"]["years"].is_array());
    }

    #[test]
    fn missing_contract_serializes_as_null() {
        let report = report(Product::PraediGene, OrganizationType::MediumHospital);
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_report(&report).unwrap();

        let value: Value = serde_json::from_slice(&buffer).unwrap();
        assert!(value["contract"].is_null());
        assert_eq!(value["results"]["components"].as_array().unwrap().len(), 4);
    }
}
