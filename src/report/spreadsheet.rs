//! Row projector and XLSX writer.

use rust_xlsxwriter::{Color as XlsxColor, Format, Workbook};

use super::layout::PLACEHOLDER;
use super::sections::{self, timestamp, FieldSpec};
use super::ReportError;
use crate::models::ResidentSnapshot;

pub const SHEET_NAME: &str = "Residents";

enum Source {
    Field(FieldSpec),
    Snapshot(fn(&ResidentSnapshot) -> Option<String>),
}

/// One spreadsheet column: header, fixed width (in characters), value source.
pub struct Column {
    pub header: &'static str,
    pub width: f64,
    source: Source,
}

impl Column {
    fn value(&self, snapshot: &ResidentSnapshot) -> Option<String> {
        match &self.source {
            Source::Field(field) => field.read(&snapshot.resident),
            Source::Snapshot(read) => read(snapshot),
        }
    }
}

const fn field(header: &'static str, width: f64, spec: FieldSpec) -> Column {
    Column {
        header,
        width,
        source: Source::Field(spec),
    }
}

macro_rules! text_column {
    ($header:literal, $width:literal, $field:ident) => {
        Column {
            header: $header,
            width: $width,
            source: Source::Snapshot(|s: &ResidentSnapshot| sections::text(&s.resident.$field)),
        }
    };
}

fn document_names(snapshot: &ResidentSnapshot) -> Option<String> {
    if snapshot.documents.is_empty() {
        return None;
    }
    Some(
        snapshot
            .documents
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

pub static COLUMNS: [Column; 27] = [
    field("Registration No", 18.0, sections::REGISTRATION_NO),
    field("Name", 24.0, sections::NAME),
    field("Admission Date", 14.0, sections::ADMISSION_DATE),
    field("Date of Birth", 14.0, sections::DATE_OF_BIRTH),
    field("Age", 6.0, sections::AGE),
    field("Gender", 10.0, sections::GENDER),
    field("Category", 14.0, sections::CATEGORY),
    field("Mobile", 14.0, sections::MOBILE),
    text_column!("Email", 24.0, email),
    field("Address", 40.0, sections::ADDRESS),
    Column {
        header: "Pincode",
        width: 10.0,
        source: Source::Snapshot(|s: &ResidentSnapshot| sections::text(&s.resident.address.pincode)),
    },
    field("Guardian Name", 20.0, sections::GUARDIAN_NAME),
    text_column!("Guardian Relation", 14.0, guardian_relation),
    field("Guardian Mobile", 14.0, sections::GUARDIAN_MOBILE),
    field("Emergency Contact", 20.0, sections::EMERGENCY_NAME),
    field("Emergency Number", 14.0, sections::EMERGENCY_NUMBER),
    field("Health Status", 14.0, sections::HEALTH_STATUS),
    field("Blood Group", 10.0, sections::BLOOD_GROUP),
    field("Allergies", 20.0, sections::ALLERGIES),
    field("Current Medications", 30.0, sections::CURRENT_MEDICATIONS),
    field("Primary Doctor", 20.0, sections::PRIMARY_DOCTOR),
    field("Status", 12.0, sections::STATUS),
    field("Ward", 10.0, sections::WARD),
    field("Room", 8.0, sections::ROOM),
    Column {
        header: "Documents",
        width: 40.0,
        source: Source::Snapshot(document_names),
    },
    Column {
        header: "Care Events",
        width: 10.0,
        source: Source::Snapshot(|s: &ResidentSnapshot| Some(s.resident.care_events.len().to_string())),
    },
    Column {
        header: "Created At",
        width: 20.0,
        source: Source::Snapshot(|s: &ResidentSnapshot| timestamp(&s.resident.created_at)),
    },
];

/// Flatten one snapshot into a row, `N/A` for anything missing.
pub fn project_row(snapshot: &ResidentSnapshot) -> Vec<String> {
    COLUMNS
        .iter()
        .map(|column| {
            column
                .value(snapshot)
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        })
        .collect()
}

/// Write a single worksheet with a header row and one row per snapshot.
pub fn write_workbook(snapshots: &[ResidentSnapshot]) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(XlsxColor::RGB(0xD9E1F2));

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, column) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            sheet.set_column_width(col, column.width)?;
            sheet.write_string_with_format(0, col, column.header, &header_format)?;
        }

        for (index, snapshot) in snapshots.iter().enumerate() {
            let row = index as u32 + 1;
            for (col, value) in project_row(snapshot).iter().enumerate() {
                sheet.write_string(row, col as u16, value)?;
            }
        }
        sheet.set_freeze_panes(1, 0)?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(rows = snapshots.len(), bytes = bytes.len(), "Workbook written");
    Ok(bytes)
}
