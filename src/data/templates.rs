use super::DataKind;

/// Example CSV with the expected columns for a kind; `None` for generic.
pub fn template_csv(kind: DataKind) -> Option<&'static str> {
    match kind {
        DataKind::HaiRates => Some(
            "facility,hai_type,rolling_12_months_rate,unit_of_measure\n\
             Hospital A,CLABSI,0.5,per 1000 central line days\n\
             Hospital B,CLABSI,0.8,per 1000 central line days\n",
        ),
        DataKind::AntibioticDot => Some(
            "facility,quarter,year,dot_per_1000_days\n\
             Hospital A,Q1,2024,350.5\n\
             Hospital B,Q1,2024,425.3\n",
        ),
        DataKind::PatientDays => Some(
            "facility,facility_code,bed_days_annual\n\
             Hospital A,A01,50000\n\
             Hospital B,B01,75000\n",
        ),
        DataKind::GeneticTests => Some(
            "test_type,annual_volume,in_house_cost,outsource_cost\n\
             PGx,1000,200,350\n\
             TSO500,200,1500,1800\n\
             BIAS2015,500,1000,1200\n\
             Cytogenetics,400,600,850\n",
        ),
        DataKind::Generic => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{detect_kind, parse_records, DataFile};
    use crate::data::records::{DotRecord, GeneticTestRecord};

    #[test]
    fn templates_detect_as_their_own_kind() {
        for kind in DataKind::TYPED {
            let csv = template_csv(kind).unwrap();
            let file = DataFile::from_reader("template.csv", csv.as_bytes()).unwrap();
            assert_eq!(file.kind, kind);
            assert_eq!(detect_kind(&file.headers), kind);
        }
        assert!(template_csv(DataKind::Generic).is_none());
    }

    #[test]
    fn templates_parse_into_records() {
        let csv = template_csv(DataKind::GeneticTests).unwrap();
        let file = DataFile::from_reader("tests.csv", csv.as_bytes()).unwrap();
        let tests: Vec<GeneticTestRecord> = parse_records(&file).unwrap();
        assert_eq!(tests.len(), 4);
        assert_eq!(tests[1].outsource_cost, Some(1800.0));

        let csv = template_csv(DataKind::AntibioticDot).unwrap();
        let file = DataFile::from_reader("dot.csv", csv.as_bytes()).unwrap();
        let dot: Vec<DotRecord> = parse_records(&file).unwrap();
        assert_eq!(dot[0].year, 2024);
    }
}
