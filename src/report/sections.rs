//! Field catalog: every printable resident field with its label, width and
//! value accessor. Templates pick from these tables.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::Resident;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// Half the content width; consecutive halves are paired on one line.
    Half,
    Full,
    /// Full width, grows with wrapped text.
    Multiline,
}

/// One printable field.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub label: &'static str,
    pub width: FieldWidth,
    pub value: fn(&Resident) -> Option<String>,
}

impl FieldSpec {
    pub fn read(&self, resident: &Resident) -> Option<String> {
        (self.value)(resident)
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("label", &self.label)
            .field("width", &self.width)
            .finish()
    }
}

pub(crate) fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn date(value: &Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format("%d %b %Y").to_string())
}

pub(crate) fn timestamp(value: &Option<DateTime<Utc>>) -> Option<String> {
    value.map(|t| t.format("%d %b %Y %H:%M UTC").to_string())
}

fn coordinates(resident: &Resident) -> Option<String> {
    match (resident.address.latitude, resident.address.longitude) {
        (Some(lat), Some(lon)) => Some(format!("{lat:.5}, {lon:.5}")),
        _ => None,
    }
}

macro_rules! field {
    ($label:literal, $width:ident, $field:ident) => {
        FieldSpec {
            label: $label,
            width: FieldWidth::$width,
            value: |r: &Resident| text(&r.$field),
        }
    };
    ($label:literal, $width:ident, date $field:ident) => {
        FieldSpec {
            label: $label,
            width: FieldWidth::$width,
            value: |r: &Resident| date(&r.$field),
        }
    };
    ($label:literal, $width:ident, stamp $field:ident) => {
        FieldSpec {
            label: $label,
            width: FieldWidth::$width,
            value: |r: &Resident| timestamp(&r.$field),
        }
    };
    ($label:literal, $width:ident, address $field:ident) => {
        FieldSpec {
            label: $label,
            width: FieldWidth::$width,
            value: |r: &Resident| text(&r.address.$field),
        }
    };
}

pub const NAME: FieldSpec = field!("Name", Full, name);
pub const REGISTRATION_NO: FieldSpec = field!("Registration No", Half, registration_no);
pub const ADMISSION_DATE: FieldSpec = field!("Admission Date", Half, date admission_date);
pub const DATE_OF_BIRTH: FieldSpec = field!("Date of Birth", Half, date date_of_birth);
pub const AGE: FieldSpec = FieldSpec {
    label: "Age",
    width: FieldWidth::Half,
    value: |r: &Resident| r.age.map(|a| a.to_string()),
};
pub const GENDER: FieldSpec = field!("Gender", Half, gender);
pub const CATEGORY: FieldSpec = field!("Category", Half, category);
pub const ADDRESS: FieldSpec = FieldSpec {
    label: "Address",
    width: FieldWidth::Multiline,
    value: |r: &Resident| r.address.composed(),
};
pub const STATUS: FieldSpec = field!("Status", Half, status);
pub const HEALTH_STATUS: FieldSpec = field!("Health Status", Half, health_status);
pub const BLOOD_GROUP: FieldSpec = field!("Blood Group", Half, blood_group);
pub const MOBILE: FieldSpec = field!("Mobile", Half, mobile_no);
pub const GUARDIAN_NAME: FieldSpec = field!("Guardian Name", Half, guardian_name);
pub const GUARDIAN_MOBILE: FieldSpec = field!("Guardian Mobile", Half, guardian_mobile);
pub const EMERGENCY_NAME: FieldSpec = field!("Emergency Contact", Half, emergency_contact_name);
pub const EMERGENCY_NUMBER: FieldSpec =
    field!("Emergency Number", Half, emergency_contact_number);
pub const ALLERGIES: FieldSpec = field!("Allergies", Full, allergies);
pub const CHRONIC_CONDITIONS: FieldSpec =
    field!("Chronic Conditions", Multiline, chronic_conditions);
pub const CURRENT_MEDICATIONS: FieldSpec =
    field!("Current Medications", Multiline, current_medications);
pub const PRIMARY_DOCTOR: FieldSpec = field!("Primary Doctor", Half, primary_doctor);
pub const MEDICAL_HISTORY: FieldSpec = field!("Medical History", Multiline, medical_history);
pub const WARD: FieldSpec = field!("Ward", Half, ward);
pub const ROOM: FieldSpec = field!("Room", Half, room_number);

pub const PERSONAL: &[FieldSpec] = &[
    NAME,
    REGISTRATION_NO,
    ADMISSION_DATE,
    DATE_OF_BIRTH,
    AGE,
    GENDER,
    CATEGORY,
    field!("Religion", Half, religion),
    field!("Marital Status", Half, marital_status),
    field!("Nationality", Half, nationality),
    field!("Mother Tongue", Half, mother_tongue),
    field!("Education", Half, education),
    field!("Occupation", Half, occupation),
    field!("ID Proof Number", Half, id_proof_number),
    field!("Identification Mark", Half, identification_mark),
];

pub const CONTACT: &[FieldSpec] = &[
    MOBILE,
    field!("Alternate Mobile", Half, alternate_mobile_no),
    field!("Email", Full, email),
];

pub const ADDRESS_FIELDS: &[FieldSpec] = &[
    field!("Full Address", Multiline, address full_address),
    field!("City", Half, address city),
    field!("District", Half, address district),
    field!("State", Half, address state),
    field!("Country", Half, address country),
    field!("Pincode", Half, address pincode),
    FieldSpec {
        label: "Coordinates",
        width: FieldWidth::Half,
        value: coordinates,
    },
];

pub const GUARDIAN: &[FieldSpec] = &[
    GUARDIAN_NAME,
    field!("Relation", Half, guardian_relation),
    GUARDIAN_MOBILE,
    field!("Guardian Email", Half, guardian_email),
    field!("Guardian Address", Multiline, guardian_address),
];

pub const EMERGENCY: &[FieldSpec] = &[
    EMERGENCY_NAME,
    field!("Emergency Relation", Half, emergency_contact_relation),
    field!("Emergency Number", Full, emergency_contact_number),
];

pub const HEALTH: &[FieldSpec] = &[
    HEALTH_STATUS,
    BLOOD_GROUP,
    field!("Height", Half, height),
    field!("Weight", Half, weight),
    field!("Mental Health", Half, mental_health_status),
    field!("Mobility", Half, mobility_status),
    ALLERGIES,
    CHRONIC_CONDITIONS,
    field!("Disabilities", Multiline, disabilities),
];

pub const MEDICAL_DETAIL: &[FieldSpec] = &[
    MEDICAL_HISTORY,
    CURRENT_MEDICATIONS,
    PRIMARY_DOCTOR,
    field!("Hospital Preference", Half, hospital_preference),
    field!("Last Checkup", Half, date last_checkup_date),
    field!("Dietary Requirements", Half, dietary_requirements),
    field!("Medical Notes", Multiline, medical_notes),
];

pub const INFORMER: &[FieldSpec] = &[
    field!("Informer Name", Half, informer_name),
    field!("Informer Mobile", Half, informer_mobile),
    field!("Informer Relation", Half, informer_relation),
    field!("Rescue Location", Half, rescue_location),
    field!("Informer Address", Multiline, informer_address),
];

pub const TRANSPORT: &[FieldSpec] = &[
    field!("Transport Mode", Half, transport_mode),
    field!("Vehicle Number", Half, vehicle_number),
    field!("Driver Name", Half, driver_name),
    field!("Driver Mobile", Half, driver_mobile),
    field!("Pickup Location", Half, pickup_location),
    field!("Arrival Time", Half, arrival_time),
];

pub const ADMINISTRATIVE: &[FieldSpec] = &[
    STATUS,
    WARD,
    ROOM,
    field!("Bed", Half, bed_number),
    field!("Admitted By", Half, admitted_by),
    field!("Referred By", Half, referred_by),
    field!("Police Station", Half, police_station),
    field!("Case Number", Half, case_number),
    field!("Discharge Date", Full, date discharge_date),
];

pub const FINANCIAL: &[FieldSpec] = &[
    field!("Monthly Fee", Half, monthly_fee),
    field!("Deposit Amount", Half, deposit_amount),
    field!("Payment Mode", Half, payment_mode),
    field!("Payment Status", Half, payment_status),
    field!("Sponsor", Half, sponsor_name),
    field!("Pension Details", Half, pension_details),
    field!("Bank Name", Half, bank_name),
    field!("Account Number", Half, bank_account_number),
];

pub const NOTES: &[FieldSpec] = &[
    field!("Remarks", Multiline, remarks),
    field!("Special Needs", Multiline, special_needs),
    field!("Behavioral Notes", Multiline, behavioral_notes),
];

pub const UPDATE_TRACKING: &[FieldSpec] = &[
    field!("Created At", Half, stamp created_at),
    field!("Created By", Half, created_by),
    field!("Updated At", Half, stamp updated_at),
    field!("Updated By", Half, updated_by),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    #[test]
    fn blank_text_reads_as_absent() {
        let resident = Resident {
            religion: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(PERSONAL[7].label, "Religion");
        assert_eq!(PERSONAL[7].read(&resident), None);
    }

    #[test]
    fn dates_are_formatted() {
        let resident = Resident {
            admission_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            ..Default::default()
        };
        assert_eq!(ADMISSION_DATE.read(&resident).as_deref(), Some("15 Jan 2024"));
    }

    #[test]
    fn address_field_is_composed() {
        let resident = Resident {
            address: Address {
                district: Some("Pune".into()),
                state: Some("MH".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(ADDRESS.read(&resident).as_deref(), Some("Pune, MH"));
    }

    #[test]
    fn coordinates_need_both_parts() {
        let mut resident = Resident::default();
        resident.address.latitude = Some(18.52);
        let field = ADDRESS_FIELDS[6];
        assert_eq!(field.read(&resident), None);
        resident.address.longitude = Some(73.8567);
        assert_eq!(field.read(&resident).as_deref(), Some("18.52000, 73.85670"));
    }

    #[test]
    fn empty_resident_reads_nothing() {
        let resident = Resident::default();
        for table in [PERSONAL, CONTACT, ADDRESS_FIELDS, HEALTH, FINANCIAL, UPDATE_TRACKING] {
            for field in table {
                assert_eq!(field.read(&resident), None, "{}", field.label);
            }
        }
    }
}
