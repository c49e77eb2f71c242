//! Report templates as data.
//!
//! A template is an ordered table of sections; one shared loop in the
//! renderer interprets it. Section order always follows `SectionId` order.

use super::layout::Spacing;
use super::sections::{self, FieldSpec};
use crate::models::enums::ReportTemplate;

/// Sections in their fixed domain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SectionId {
    Personal,
    Contact,
    Address,
    Guardian,
    Emergency,
    Health,
    MedicalDetail,
    Informer,
    Transport,
    Administrative,
    Financial,
    Notes,
    UpdateTracking,
    Media,
    Documents,
    CareEvents,
}

#[derive(Debug, Clone, Copy)]
pub enum SectionContent {
    Fields(&'static [FieldSpec]),
    /// Before/after admission photos, fetched and embedded.
    Photos,
    /// One entry per document; images fetched and embedded inline.
    DocumentDetails,
    /// A single "Documents" line listing names, or "None".
    DocumentList,
    CareEvents,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionPlan {
    pub id: SectionId,
    pub title: &'static str,
    pub content: SectionContent,
}

#[derive(Debug)]
pub struct TemplateSpec {
    pub template: ReportTemplate,
    pub title: &'static str,
    pub chars_per_line: usize,
    pub spacing: Spacing,
    pub sections: &'static [SectionPlan],
}

const fn plan(id: SectionId, title: &'static str, content: SectionContent) -> SectionPlan {
    SectionPlan { id, title, content }
}

const NO_FIELDS: &[FieldSpec] = &[];

use SectionContent::{CareEvents, DocumentDetails, DocumentList, Fields, Photos};

const DETAILED_SECTIONS: &[SectionPlan] = &[
    plan(SectionId::Personal, "Personal Information", Fields(sections::PERSONAL)),
    plan(SectionId::Contact, "Contact Information", Fields(sections::CONTACT)),
    plan(SectionId::Address, "Address", Fields(sections::ADDRESS_FIELDS)),
    plan(SectionId::Guardian, "Guardian Details", Fields(sections::GUARDIAN)),
    plan(SectionId::Emergency, "Emergency Contact", Fields(sections::EMERGENCY)),
    plan(SectionId::Health, "Health Information", Fields(sections::HEALTH)),
    plan(SectionId::MedicalDetail, "Medical Details", Fields(sections::MEDICAL_DETAIL)),
    plan(SectionId::Informer, "Informer Details", Fields(sections::INFORMER)),
    plan(SectionId::Transport, "Transport Details", Fields(sections::TRANSPORT)),
    plan(SectionId::Administrative, "Administrative", Fields(sections::ADMINISTRATIVE)),
    plan(SectionId::Financial, "Financial Information", Fields(sections::FINANCIAL)),
    plan(SectionId::Notes, "Notes", Fields(sections::NOTES)),
    plan(SectionId::UpdateTracking, "Record History", Fields(sections::UPDATE_TRACKING)),
    plan(SectionId::Media, "Photographs", Photos),
    plan(SectionId::Documents, "Documents", DocumentDetails),
    plan(SectionId::CareEvents, "Care Events", CareEvents),
];

const SUMMARY_ESSENTIALS: &[FieldSpec] = &[
    sections::GENDER,
    sections::AGE,
    sections::HEALTH_STATUS,
    sections::BLOOD_GROUP,
    sections::CATEGORY,
    sections::STATUS,
    sections::MOBILE,
    sections::ADMISSION_DATE,
    sections::ADDRESS,
];

const SUMMARY_CONTACTS: &[FieldSpec] = &[
    sections::GUARDIAN_NAME,
    sections::GUARDIAN_MOBILE,
    sections::EMERGENCY_NAME,
    sections::EMERGENCY_NUMBER,
];

const SUMMARY_MEDICAL: &[FieldSpec] = &[
    sections::ALLERGIES,
    sections::CURRENT_MEDICATIONS,
    sections::PRIMARY_DOCTOR,
];

const SUMMARY_SECTIONS: &[SectionPlan] = &[
    plan(SectionId::Personal, "Essential Information", Fields(SUMMARY_ESSENTIALS)),
    plan(SectionId::Guardian, "Guardian & Emergency Contact", Fields(SUMMARY_CONTACTS)),
    plan(SectionId::Health, "Medical Overview", Fields(SUMMARY_MEDICAL)),
    plan(SectionId::Documents, "Documents", DocumentList),
];

const MEDICAL_HEALTH: &[FieldSpec] = &[
    sections::HEALTH_STATUS,
    sections::BLOOD_GROUP,
    sections::AGE,
    sections::GENDER,
    sections::ALLERGIES,
    sections::CHRONIC_CONDITIONS,
];

const MEDICAL_SECTIONS: &[SectionPlan] = &[
    plan(SectionId::Emergency, "Emergency Contact", Fields(sections::EMERGENCY)),
    plan(SectionId::Health, "Health Information", Fields(MEDICAL_HEALTH)),
    plan(SectionId::MedicalDetail, "Medical Details", Fields(sections::MEDICAL_DETAIL)),
    plan(SectionId::Documents, "Medical Documents", DocumentList),
    plan(SectionId::CareEvents, "Care History", CareEvents),
];

const PRINT_PERSONAL: &[FieldSpec] = &[
    sections::NAME,
    sections::REGISTRATION_NO,
    sections::ADMISSION_DATE,
    sections::AGE,
    sections::GENDER,
    sections::CATEGORY,
    sections::STATUS,
];

const PRINT_CARE: &[FieldSpec] = &[
    sections::HEALTH_STATUS,
    sections::BLOOD_GROUP,
    sections::WARD,
    sections::ROOM,
    sections::ALLERGIES,
];

const PRINT_SECTIONS: &[SectionPlan] = &[
    plan(SectionId::Personal, "Resident", Fields(PRINT_PERSONAL)),
    plan(SectionId::Contact, "Contact", Fields(sections::CONTACT)),
    plan(SectionId::Address, "Address", Fields(&[sections::ADDRESS])),
    plan(SectionId::Guardian, "Guardian", Fields(SUMMARY_CONTACTS)),
    plan(SectionId::Health, "Care", Fields(PRINT_CARE)),
];

static DETAILED: TemplateSpec = TemplateSpec {
    template: ReportTemplate::Detailed,
    title: "Resident Detailed Report",
    chars_per_line: 45,
    spacing: Spacing::REGULAR,
    sections: DETAILED_SECTIONS,
};

static SUMMARY: TemplateSpec = TemplateSpec {
    template: ReportTemplate::Summary,
    title: "Resident Summary",
    chars_per_line: 55,
    spacing: Spacing::REGULAR,
    sections: SUMMARY_SECTIONS,
};

static MEDICAL: TemplateSpec = TemplateSpec {
    template: ReportTemplate::Medical,
    title: "Resident Medical Report",
    chars_per_line: 40,
    spacing: Spacing::REGULAR,
    sections: MEDICAL_SECTIONS,
};

static PRINT: TemplateSpec = TemplateSpec {
    template: ReportTemplate::Print,
    title: "Resident Record",
    chars_per_line: 55,
    spacing: Spacing::COMPACT,
    sections: PRINT_SECTIONS,
};

pub fn template_spec(template: ReportTemplate) -> &'static TemplateSpec {
    match template {
        ReportTemplate::Detailed => &DETAILED,
        ReportTemplate::Summary => &SUMMARY,
        ReportTemplate::Medical => &MEDICAL,
        ReportTemplate::Print => &PRINT,
    }
}

impl TemplateSpec {
    /// Every field printed by this template, in order.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let sections: &'static [SectionPlan] = self.sections;
        sections.iter().flat_map(|s| match s.content {
            SectionContent::Fields(fields) => fields.iter(),
            _ => NO_FIELDS.iter(),
        })
    }

    pub fn embeds_remote_content(&self) -> bool {
        self.sections
            .iter()
            .any(|s| matches!(s.content, SectionContent::Photos | SectionContent::DocumentDetails))
    }
}
