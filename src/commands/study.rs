use super::Session;
use crate::cli::{StudyArgs, StudySection};
use crate::formatting::{format_currency, format_number, format_percent};
use crate::study::{
    annual_financials_per_facility, annual_outcomes, control_group, derived_comparisons,
    facility_summary, financial_impact, hai_types, methodology, sensitivity_table,
    target_hospitals, CostItem, KEY_METRICS, STUDY_FACILITIES, STUDY_FINANCIALS,
    STUDY_OUTCOMES, STUDY_PERIOD,
};
use anyhow::Result;
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde_json::{json, Value};
use std::fmt::Write;

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn table(plain: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if plain {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL
        })
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn metric_table(rows: Vec<(&str, String)>, plain: bool) -> Table {
    let mut t = table(plain);
    t.set_header(vec!["Metric", "Value"]);
    for (label, value) in rows {
        t.add_row(vec![Cell::new(label), right(value)]);
    }
    t
}

fn cost_table(title: &str, items: &[CostItem], plain: bool) -> Table {
    let mut t = table(plain);
    t.set_header(vec![title, "Amount"]);
    for item in items {
        t.add_row(vec![Cell::new(item.item), right(format_currency(item.amount))]);
    }
    let total: f64 = items.iter().map(|i| i.amount).sum();
    t.add_row(vec![Cell::new("Total"), right(format_currency(total))]);
    t
}

fn signed_percent(value: f64) -> String {
    format!("{value:+.1}%")
}

/// Human-readable rendering of one study section.
pub fn render_section(section: StudySection, plain: bool) -> Result<String> {
    let mut out = String::new();
    match section {
        StudySection::Overview => {
            let outcomes = STUDY_OUTCOMES;
            let derived = derived_comparisons();
            let control = control_group();
            let annual = annual_outcomes();
            writeln!(out, "PraediAlert 18-month study ({STUDY_PERIOD})")?;
            writeln!(
                out,
                "{} intervention facilities against {} controls",
                outcomes.facilities, outcomes.control_facilities
            )?;
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                metric_table(
                    vec![
                        ("HAIs Prevented", format_number(outcomes.hais_prevented)),
                        ("HAI Reduction", format_percent(outcomes.hai_reduction_rate * 100.0)),
                        (
                            "Improvement vs Control",
                            format_percent(outcomes.relative_improvement * 100.0)
                        ),
                        ("Lives Saved", format_number(outcomes.lives_saved)),
                        ("Hospital Days Saved", format_number(outcomes.hospital_days_saved)),
                        ("Outbreaks Detected", format_number(outcomes.outbreaks_detected)),
                        ("Intervention Change", signed_percent(derived.intervention_change)),
                        (
                            "Control Change",
                            format!("{} ({})", signed_percent(derived.control_change), control.significance)
                        ),
                        (
                            "Difference in Differences",
                            format!("{:+.1} pts", derived.difference_in_differences)
                        ),
                    ],
                    plain
                )
            )?;
            writeln!(
                out,
                "Control facilities averaged {:.1} HAIs before and {:.1} after",
                control.average_pre(),
                control.average_post()
            )?;
            writeln!(out)?;
            writeln!(out, "Key cost metrics")?;
            writeln!(
                out,
                "{}",
                metric_table(
                    vec![
                        ("Cost per HAI", format_currency(KEY_METRICS.cost_per_hai)),
                        ("Cost per Hospital Day", format_currency(KEY_METRICS.cost_per_hospital_day)),
                        (
                            "LOS Extension (days)",
                            format_number(KEY_METRICS.average_los_extension_days)
                        ),
                        ("Mortality Rate", format_percent(KEY_METRICS.mortality_rate * 100.0)),
                        ("Value per Life", format_currency(KEY_METRICS.life_value)),
                        ("Outbreak Cost", format_currency(KEY_METRICS.outbreak_cost)),
                    ],
                    plain
                )
            )?;
            writeln!(out, "Per facility per year")?;
            writeln!(
                out,
                "{}",
                metric_table(
                    vec![
                        ("HAIs Prevented", format_number(annual.hais_prevented_per_facility)),
                        ("Lives Saved", format_number(annual.lives_saved_per_facility)),
                        (
                            "Hospital Days Saved",
                            format_number(annual.hospital_days_saved_per_facility)
                        ),
                        (
                            "Outbreak Detection Probability",
                            format_percent(annual.outbreak_detection_probability * 100.0)
                        ),
                    ],
                    plain
                )
            )?;
        }
        StudySection::Facilities => {
            let mut t = table(plain);
            t.set_header(vec![
                "Facility", "Region", "Go-Live", "Beds", "Pre", "Post", "Reduction", "Outcome",
            ]);
            for facility in &STUDY_FACILITIES {
                t.add_row(vec![
                    Cell::new(facility.name),
                    Cell::new(facility.region),
                    Cell::new(facility.go_live),
                    right(facility.beds),
                    right(facility.pre_hais),
                    right(facility.post_hais),
                    right(format_percent(facility.reduction_percent())),
                    Cell::new(facility.outcome),
                ]);
            }
            writeln!(out, "{t}")?;
            let summary = facility_summary();
            writeln!(
                out,
                "{} HAIs before, {} after: {} prevented, average reduction {}",
                format_number(summary.total_pre_hais),
                format_number(summary.total_post_hais),
                format_number(summary.total_reduction),
                format_percent(summary.average_reduction_percent)
            )?;
            writeln!(
                out,
                "{} of {} facilities without outbreaks; {} detected and contained outbreaks; {} beds",
                summary.facilities_with_reduction,
                STUDY_FACILITIES.len(),
                summary.facilities_with_outbreak_detection,
                format_number(f64::from(summary.total_beds))
            )?;
        }
        StudySection::HaiTypes => {
            let mut t = table(plain);
            t.set_header(vec![
                "HAI Type",
                "Intervention Pre",
                "Post",
                "Change",
                "Control Pre",
                "Post",
                "Change",
                "Net Benefit",
            ]);
            for hai in hai_types() {
                t.add_row(vec![
                    Cell::new(format!("{} ({})", hai.name, hai.code)),
                    right(format_number(hai.intervention_pre)),
                    right(format_number(hai.intervention_post)),
                    right(signed_percent(hai.intervention_change())),
                    right(format_number(hai.control_pre)),
                    right(format_number(hai.control_post)),
                    right(signed_percent(hai.control_change())),
                    right(format_percent(hai.net_benefit_percent)),
                ]);
            }
            writeln!(out, "{t}")?;
        }
        StudySection::Financial => {
            let impact = financial_impact();
            writeln!(out, "{}", cost_table("Cost per HAI", &impact.per_hai_costs, plain))?;
            writeln!(out, "{}", cost_table("Implementation", &impact.implementation, plain))?;
            writeln!(out, "{}", cost_table("Annual Operating", &impact.annual_operating, plain))?;
            writeln!(out, "{}", cost_table("Savings (18 months)", &impact.savings_18_months, plain))?;
            writeln!(
                out,
                "Payback {} months (break-even month {}); first-year ROI {}; 5-year ROI {}",
                impact.payback_months,
                impact.break_even_month,
                format_percent(impact.first_year_roi),
                format_percent(impact.five_year_roi)
            )?;
            writeln!(
                out,
                "Annual operating cost {} against {} saved over the study",
                format_currency(impact.operating_total()),
                format_currency(impact.savings_total())
            )?;
            writeln!(out)?;

            let annual = annual_financials_per_facility();
            writeln!(out, "Per facility per year")?;
            writeln!(
                out,
                "{}",
                metric_table(
                    vec![
                        ("Implementation", format_currency(annual.implementation_cost)),
                        ("Annual Operating", format_currency(annual.annual_operating)),
                        ("Direct Savings", format_currency(annual.direct_savings)),
                        ("LOS Savings", format_currency(annual.los_savings)),
                        ("Mortality Value", format_currency(annual.mortality_value)),
                        ("Outbreak Savings", format_currency(annual.outbreak_savings)),
                        ("Total Annual Savings", format_currency(annual.total_annual_savings)),
                    ],
                    plain
                )
            )?;

            let mut t = table(plain);
            t.set_header(vec!["Sensitivity", "Pessimistic", "Base Case", "Optimistic", "Impact"]);
            for row in sensitivity_table() {
                t.add_row(vec![
                    Cell::new(row.name),
                    right(format_number(row.pessimistic)),
                    right(format_number(row.base_case)),
                    right(format_number(row.optimistic)),
                    Cell::new(row.impact),
                ]);
            }
            writeln!(out, "{t}")?;
        }
        StudySection::Targets => {
            let mut t = table(plain);
            t.set_header(vec![
                "Hospital",
                "Beds",
                "HAIs Prevented",
                "Lives Saved",
                "Days Saved",
                "Annual Savings",
            ]);
            let mut total = 0.0;
            for hospital in target_hospitals() {
                let savings = hospital.annual_savings();
                total += savings.total_savings;
                t.add_row(vec![
                    Cell::new(hospital.name),
                    right(hospital.beds),
                    right(format_number(savings.hais_prevented)),
                    right(format_number(savings.lives_saved)),
                    right(format_number(savings.days_saved)),
                    right(format_currency(savings.total_savings)),
                ]);
            }
            writeln!(out, "{t}")?;
            writeln!(out, "Combined annual savings: {}", format_currency(total))?;
        }
        StudySection::Methodology => {
            for section in methodology() {
                writeln!(out, "{}", section.title)?;
                for (i, step) in section.steps.iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, step.name)?;
                    writeln!(out, "     {}", step.formula)?;
                    writeln!(out, "     e.g. {}", step.example)?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(out)
}

/// Machine-readable form of one study section.
pub fn section_json(section: StudySection) -> Value {
    match section {
        StudySection::Overview => json!({
            "study_period": STUDY_PERIOD,
            "outcomes": STUDY_OUTCOMES,
            "key_metrics": KEY_METRICS,
            "financials": STUDY_FINANCIALS,
            "control_group": control_group(),
            "derived": derived_comparisons(),
            "annual_per_facility": annual_outcomes(),
        }),
        StudySection::Facilities => json!({
            "facilities": STUDY_FACILITIES,
            "summary": facility_summary(),
        }),
        StudySection::HaiTypes => json!({ "hai_types": hai_types() }),
        StudySection::Financial => json!({
            "impact": financial_impact(),
            "annual_per_facility": annual_financials_per_facility(),
            "sensitivity": sensitivity_table(),
        }),
        StudySection::Targets => {
            let hospitals: Vec<Value> = target_hospitals()
                .iter()
                .map(|h| json!({ "hospital": h, "annual_savings": h.annual_savings() }))
                .collect();
            json!({ "target_hospitals": hospitals })
        }
        StudySection::Methodology => json!({ "methodology": methodology() }),
    }
}

pub fn handle_study(session: &Session, args: &StudyArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&section_json(args.section))?);
        return Ok(());
    }
    print!("{}", render_section(args.section, session.formatting.is_plain())?);
    Ok(())
}
