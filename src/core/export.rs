//! Report sheets and their export as an xlsx workbook or CSV files.
//!
//! Each report is built as a [`Sheet`] of already-formatted cells so the
//! same data can be rendered to a worksheet, to CSV or inspected in tests.
//! Money is written with two decimals, percentages with one.

use crate::{
    core::{commission, metrics},
    errors::Result,
    models::{CommissionRule, Course, Lead, LeadStatus, Seller},
};
use chrono::NaiveDate;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, XlsxError};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

const TOTAL_LABEL: &str = "TOTAL";
const WORKBOOK_PREFIX: &str = "sales_reports";
const MISSING: &str = "N/A";

/// A named table of formatted cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    /// File-name friendly sheet name
    pub name: String,
    /// Column headers
    pub headers: Vec<String>,
    /// Data rows, each as long as `headers`
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Renders the sheet as CSV, header line first.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = to_csv_line(&self.headers);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&to_csv_line(row));
            out.push('\n');
        }
        out
    }
}

/// Quotes a cell when it contains a separator, a quote or a line break.
#[must_use]
pub fn csv_escape(value: &str) -> String {
    if value.contains(['\n', '\r', '"', ',']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn to_csv_line(values: &[String]) -> String {
    values
        .iter()
        .map(|v| csv_escape(v))
        .collect::<Vec<_>>()
        .join(",")
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

fn day(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| MISSING.to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// One row per seller: lead counts, conversion, revenue, commission owed
/// at resolved rates, and progress against the annual quota.
#[must_use]
pub fn sales_performance(sellers: &[Seller], leads: &[Lead], rules: &[CommissionRule]) -> Sheet {
    let mut sheet = Sheet::new(
        "sales_performance",
        &[
            "Seller",
            "Total leads",
            "Converted leads",
            "Conversion rate",
            "Registrations",
            "Revenue",
            "Commission",
            "Annual quota",
            "Quota reached",
        ],
    );

    for seller in sellers {
        let own: Vec<Lead> = leads
            .iter()
            .filter(|l| l.seller_id == seller.id)
            .cloned()
            .collect();
        let converted = own.iter().filter(|l| l.is_converted()).count();
        let revenue = metrics::total_revenue(&own);
        let owed: f64 = own
            .iter()
            .filter(|l| l.is_converted())
            .map(|l| commission::commission_for_lead(rules, l))
            .sum();

        sheet.rows.push(vec![
            seller.name.clone(),
            own.len().to_string(),
            converted.to_string(),
            percent(metrics::conversion_rate(&own)),
            metrics::total_registrations(&own).to_string(),
            money(revenue),
            money(owed),
            money(seller.annual_quota),
            percent(ratio_percent(revenue, seller.annual_quota)),
        ]);
    }
    sheet
}

/// One row per region: course count, registrations, revenue and average
/// ticket, highest revenue first.
#[must_use]
pub fn regional_analysis(courses: &[Course], leads: &[Lead]) -> Sheet {
    let mut sheet = Sheet::new(
        "regional_analysis",
        &[
            "Region",
            "Courses",
            "Registrations",
            "Revenue",
            "Average ticket",
        ],
    );

    for totals in metrics::revenue_by_region(courses, leads) {
        let ticket = totals.revenue / f64::from(totals.registrations.max(1));
        sheet.rows.push(vec![
            totals.region,
            totals.courses.to_string(),
            totals.registrations.to_string(),
            money(totals.revenue),
            money(ticket),
        ]);
    }
    sheet
}

/// One row per course with registrations against its target.
#[must_use]
pub fn course_analysis(courses: &[Course], leads: &[Lead]) -> Sheet {
    let mut sheet = Sheet::new(
        "course_analysis",
        &[
            "Course",
            "Location",
            "Starts",
            "Ends",
            "Status",
            "Registrations",
            "Target",
            "Target reached",
            "Total leads",
            "Revenue",
            "Average ticket",
        ],
    );

    for course in courses {
        let registrations = metrics::registrations_by_course(leads, course.id);
        let revenue = metrics::revenue_by_course(leads, course.id);
        let target = course.registration_target.unwrap_or(0);
        let total_leads = leads.iter().filter(|l| l.course_id == course.id).count();
        let ticket = if registrations > 0 {
            revenue / f64::from(registrations)
        } else {
            0.0
        };

        sheet.rows.push(vec![
            course.topic.clone(),
            format!("{}, {}", course.city, course.region),
            day(Some(course.starts_on)),
            day(Some(course.ends_on)),
            course.status.label().to_string(),
            registrations.to_string(),
            target.to_string(),
            percent(ratio_percent(f64::from(registrations), f64::from(target))),
            total_leads.to_string(),
            money(revenue),
            money(ticket),
        ]);
    }
    sheet
}

/// One row per converted lead with its resolved rate and commission, then
/// a total row.
#[must_use]
pub fn commissions(
    sellers: &[Seller],
    courses: &[Course],
    leads: &[Lead],
    rules: &[CommissionRule],
) -> Sheet {
    let mut sheet = Sheet::new(
        "commissions",
        &[
            "Seller",
            "Course",
            "Converted on",
            "Client",
            "Registrations",
            "Revenue",
            "Rate",
            "Commission",
        ],
    );
    let topics: HashMap<i64, &str> = courses.iter().map(|c| (c.id, c.topic.as_str())).collect();

    let mut total_revenue = 0.0;
    let mut total_commission = 0.0;
    for seller in sellers {
        for lead in leads
            .iter()
            .filter(|l| l.seller_id == seller.id && l.is_converted())
        {
            let revenue = lead.effective_value();
            let rate = commission::resolve_rate(rules, lead.seller_id, lead.course_id);
            let owed = revenue * rate / 100.0;
            total_revenue += revenue;
            total_commission += owed;

            sheet.rows.push(vec![
                seller.name.clone(),
                topics.get(&lead.course_id).unwrap_or(&MISSING).to_string(),
                day(lead.converted_on),
                lead.contact.organization.clone(),
                lead.registrations.to_string(),
                money(revenue),
                percent(rate),
                money(owed),
            ]);
        }
    }

    sheet.rows.push(vec![
        TOTAL_LABEL.to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        money(total_revenue),
        String::new(),
        money(total_commission),
    ]);
    sheet
}

/// One row per open proposal, then a total row with the pipeline value.
#[must_use]
pub fn pipeline(courses: &[Course], leads: &[Lead], sellers: &[Seller]) -> Sheet {
    let mut sheet = Sheet::new(
        "pipeline",
        &[
            "Course",
            "Course date",
            "Client",
            "Location",
            "Seller",
            "Registrations",
            "Proposed price",
            "Negotiated price",
            "Potential revenue",
            "Created on",
        ],
    );
    let courses_by_id: HashMap<i64, &Course> = courses.iter().map(|c| (c.id, c)).collect();
    let seller_names: HashMap<i64, &str> = sellers.iter().map(|s| (s.id, s.name.as_str())).collect();

    let open: Vec<&Lead> = leads
        .iter()
        .filter(|l| l.status == LeadStatus::ProposalSent)
        .collect();

    for lead in &open {
        let course = courses_by_id.get(&lead.course_id);
        sheet.rows.push(vec![
            course.map_or_else(|| MISSING.to_string(), |c| c.topic.clone()),
            day(course.map(|c| c.starts_on)),
            lead.contact.organization.clone(),
            format!("{}, {}", lead.contact.city, lead.contact.region),
            seller_names
                .get(&lead.seller_id)
                .unwrap_or(&MISSING)
                .to_string(),
            lead.registrations.to_string(),
            money(lead.proposed_price),
            lead.negotiated_price
                .map_or_else(|| "In negotiation".to_string(), money),
            money(lead.effective_value()),
            day(lead.created_on),
        ]);
    }

    let registrations: u32 = open.iter().map(|l| l.registrations).sum();
    sheet.rows.push(vec![
        TOTAL_LABEL.to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        registrations.to_string(),
        String::new(),
        String::new(),
        money(metrics::pipeline_value(leads)),
        String::new(),
    ]);
    sheet
}

/// All five report sheets in workbook order.
#[must_use]
pub fn all_sheets(
    courses: &[Course],
    leads: &[Lead],
    sellers: &[Seller],
    rules: &[CommissionRule],
) -> Vec<Sheet> {
    vec![
        sales_performance(sellers, leads, rules),
        regional_analysis(courses, leads),
        course_analysis(courses, leads),
        commissions(sellers, courses, leads, rules),
        pipeline(courses, leads, sellers),
    ]
}

fn row_index(index: usize) -> Result<RowNum> {
    RowNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError.into())
}

fn col_index(index: usize) -> Result<ColNum> {
    ColNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError.into())
}

/// Writes all sheets into one workbook at
/// `<dir>/sales_reports_<YYYY-MM-DD>.xlsx`, one named worksheet per sheet.
/// The header row is bold and cells that parse as numbers are stored as
/// numbers.
#[instrument(skip(sheets), fields(sheets = sheets.len()))]
pub fn write_workbook(dir: &Path, sheets: &[Sheet], date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, title) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col_index(col)?, title, &bold)?;
        }
        for (index, cells) in sheet.rows.iter().enumerate() {
            let row = row_index(index + 1)?;
            for (col, value) in cells.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let col = col_index(col)?;
                match value.parse::<f64>() {
                    Ok(number) => worksheet.write_number(row, col, number)?,
                    Err(_) => worksheet.write_string(row, col, value)?,
                };
            }
        }
        worksheet.autofit();
        debug!("Added worksheet {} with {} rows", sheet.name, sheet.rows.len());
    }

    let path = dir.join(format!(
        "{WORKBOOK_PREFIX}_{}.xlsx",
        date.format("%Y-%m-%d")
    ));
    workbook.save(&path)?;
    info!("Exported {} worksheets to {}", sheets.len(), path.display());
    Ok(path)
}

/// Writes each sheet to `<dir>/<sheet>_<YYYY-MM-DD>.csv`, creating the
/// directory if needed. Returns the written paths in sheet order.
#[instrument(skip(sheets), fields(sheets = sheets.len()))]
pub fn write_csv_files(dir: &Path, sheets: &[Sheet], date: NaiveDate) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let stamp = date.format("%Y-%m-%d");
    let mut written = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let path = dir.join(format!("{}_{stamp}.csv", sheet.name));
        fs::write(&path, sheet.to_csv())?;
        debug!("Wrote {} rows to {}", sheet.rows.len(), path.display());
        written.push(path);
    }

    info!("Exported {} sheets to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::RuleKind;
    use crate::test_utils::{sample_course, sample_lead, sample_seller};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn default_rule(rate: f64) -> CommissionRule {
        CommissionRule {
            id: 1,
            rate,
            seller_id: None,
            course_id: None,
            kind: RuleKind::Default,
        }
    }

    fn won(course_id: i64, seller_id: i64, value: f64) -> Lead {
        let mut lead = sample_lead(course_id, seller_id);
        lead.status = LeadStatus::EnrollmentCompleted;
        lead.proposed_price = value;
        lead.converted_on = Some(date(2025, 4, 1));
        lead
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("Recife, PE"), "\"Recife, PE\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_sheet_to_csv() {
        let mut sheet = Sheet::new("s", &["A", "B"]);
        sheet.rows.push(vec!["1".to_string(), "x,y".to_string()]);
        assert_eq!(sheet.to_csv(), "A,B\n1,\"x,y\"\n");
    }

    #[test]
    fn test_commissions_use_resolved_rates_and_total() {
        let sellers = vec![sample_seller(1, 12_000.0), sample_seller(2, 12_000.0)];
        let courses = vec![sample_course(10)];
        let rules = vec![
            default_rule(5.0),
            CommissionRule {
                id: 2,
                rate: 10.0,
                seller_id: Some(2),
                course_id: None,
                kind: RuleKind::Specific,
            },
        ];
        let leads = vec![won(10, 1, 1000.0), won(10, 2, 2000.0), sample_lead(10, 1)];

        let sheet = commissions(&sellers, &courses, &leads, &rules);
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0][6], "5.0%");
        assert_eq!(sheet.rows[0][7], "50.00");
        assert_eq!(sheet.rows[1][6], "10.0%");
        assert_eq!(sheet.rows[1][7], "200.00");

        let total = sheet.rows.last().unwrap();
        assert_eq!(total[0], "TOTAL");
        assert_eq!(total[5], "3000.00");
        assert_eq!(total[7], "250.00");
    }

    #[test]
    fn test_pipeline_lists_open_proposals_with_total() {
        let courses = vec![sample_course(10)];
        let sellers = vec![sample_seller(1, 0.0)];
        let mut open = sample_lead(10, 1);
        open.negotiated_price = Some(800.0);
        open.registrations = 2;
        let mut other = sample_lead(99, 1);
        other.registrations = 3;
        let leads = vec![open, other, won(10, 1, 5000.0)];

        let sheet = pipeline(&courses, &leads, &sellers);
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0][0], "Course 10");
        assert_eq!(sheet.rows[0][7], "800.00");
        assert_eq!(sheet.rows[1][0], "N/A");
        assert_eq!(sheet.rows[1][7], "In negotiation");

        let total = sheet.rows.last().unwrap();
        assert_eq!(total[5], "5");
        assert_eq!(total[8], "1800.00");
    }

    #[test]
    fn test_sales_performance_row() {
        let sellers = vec![sample_seller(1, 10_000.0)];
        let mut lost = sample_lead(10, 1);
        lost.status = LeadStatus::ProposalDeclined;
        let leads = vec![won(10, 1, 2500.0), lost, sample_lead(10, 1)];

        let sheet = sales_performance(&sellers, &leads, &[default_rule(4.0)]);
        let row = &sheet.rows[0];
        assert_eq!(row[1], "3");
        assert_eq!(row[2], "1");
        assert_eq!(row[3], "50.0%");
        assert_eq!(row[5], "2500.00");
        assert_eq!(row[6], "100.00");
        assert_eq!(row[8], "25.0%");
    }

    #[test]
    fn test_course_analysis_without_target() {
        let courses = vec![sample_course(10)];
        let sheet = course_analysis(&courses, &[won(10, 1, 900.0)]);
        let row = &sheet.rows[0];
        assert_eq!(row[1], "Recife, PE");
        assert_eq!(row[2], "2025-03-10");
        assert_eq!(row[6], "0");
        assert_eq!(row[7], "0.0%");
        assert_eq!(row[10], "900.00");
    }

    #[test]
    fn test_write_workbook_has_one_named_worksheet_per_report() -> Result<()> {
        use calamine::{Data, Reader, open_workbook_auto};

        let dir = tempfile::tempdir()?;
        let sheets = all_sheets(
            &[sample_course(1)],
            &[won(1, 1, 900.0)],
            &[sample_seller(1, 0.0)],
            &[default_rule(5.0)],
        );

        let path = write_workbook(dir.path(), &sheets, date(2025, 6, 30))?;
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("sales_reports_2025-06-30.xlsx")
        );

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec![
                "sales_performance",
                "regional_analysis",
                "course_analysis",
                "commissions",
                "pipeline"
            ]
        );
        let range = workbook.worksheet_range("commissions").unwrap();
        assert_eq!(
            range.get_value((0, 0)),
            Some(&Data::String("Seller".to_string()))
        );
        assert_eq!(
            range.get_value((1, 0)),
            Some(&Data::String("Seller 1".to_string()))
        );
        assert_eq!(range.get_value((1, 7)), Some(&Data::Float(45.0)));
        Ok(())
    }

    #[test]
    fn test_write_csv_files_names_files_by_sheet_and_date() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("reports");
        let sheets = all_sheets(&[sample_course(1)], &[], &[sample_seller(1, 0.0)], &[]);

        let written = write_csv_files(&out, &sheets, date(2025, 6, 30))?;

        assert_eq!(written.len(), 5);
        assert_eq!(
            written[0].file_name().and_then(|n| n.to_str()),
            Some("sales_performance_2025-06-30.csv")
        );
        let pipeline_csv = fs::read_to_string(&written[4])?;
        assert!(pipeline_csv.starts_with("Course,Course date,"));
        assert!(pipeline_csv.contains("TOTAL"));
        Ok(())
    }
}
