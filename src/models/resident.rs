use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::care_event::CareEvent;
use super::document::Document;

/// Embedded postal address. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Address {
    /// One-line address from full address, city, district, state and country.
    ///
    /// Blank segments are dropped, so the result never starts or ends with a
    /// separator. `None` when every segment is blank.
    pub fn composed(&self) -> Option<String> {
        let joined = [
            &self.full_address,
            &self.city,
            &self.district,
            &self.state,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        let trimmed = joined.trim_matches(|c| c == ',' || c == ' ');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// A person registered with the care facility.
///
/// Flat record of optional fields; `document_ids` references documents
/// stored separately, `care_events` are embedded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resident {
    pub id: Uuid,

    // Identity
    pub name: Option<String>,
    pub registration_no: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub category: Option<String>,
    pub religion: Option<String>,
    pub marital_status: Option<String>,
    pub nationality: Option<String>,
    pub mother_tongue: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub identification_mark: Option<String>,
    pub id_proof_number: Option<String>,

    // Contact
    pub mobile_no: Option<String>,
    pub alternate_mobile_no: Option<String>,
    pub email: Option<String>,

    pub address: Address,

    // Guardian
    pub guardian_name: Option<String>,
    pub guardian_relation: Option<String>,
    pub guardian_mobile: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_address: Option<String>,

    // Emergency contact
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_number: Option<String>,

    // Health
    pub health_status: Option<String>,
    pub blood_group: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    pub disabilities: Option<String>,
    pub mental_health_status: Option<String>,
    pub mobility_status: Option<String>,

    // Medical detail
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub primary_doctor: Option<String>,
    pub hospital_preference: Option<String>,
    pub last_checkup_date: Option<NaiveDate>,
    pub dietary_requirements: Option<String>,
    pub medical_notes: Option<String>,

    // Informer
    pub informer_name: Option<String>,
    pub informer_mobile: Option<String>,
    pub informer_relation: Option<String>,
    pub informer_address: Option<String>,
    pub rescue_location: Option<String>,

    // Transport
    pub transport_mode: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub driver_mobile: Option<String>,
    pub pickup_location: Option<String>,
    pub arrival_time: Option<String>,

    // Administrative
    pub status: Option<String>,
    pub ward: Option<String>,
    pub room_number: Option<String>,
    pub bed_number: Option<String>,
    pub admitted_by: Option<String>,
    pub referred_by: Option<String>,
    pub police_station: Option<String>,
    pub case_number: Option<String>,
    pub discharge_date: Option<NaiveDate>,

    // Financial
    pub monthly_fee: Option<String>,
    pub deposit_amount: Option<String>,
    pub payment_mode: Option<String>,
    pub payment_status: Option<String>,
    pub sponsor_name: Option<String>,
    pub pension_details: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,

    // Notes
    pub remarks: Option<String>,
    pub special_needs: Option<String>,
    pub behavioral_notes: Option<String>,

    // Update tracking
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,

    // Media (Blob Store URLs)
    pub photo_before_admission: Option<String>,
    pub photo_after_admission: Option<String>,
    /// Legacy single photo, superseded by the before/after pair.
    pub photo_url: Option<String>,

    pub document_ids: Vec<Uuid>,
    pub care_events: Vec<CareEvent>,
}

impl Resident {
    /// Registration number, or the raw identifier when none was assigned.
    pub fn file_stem(&self) -> String {
        self.registration_no
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(sanitize_file_stem)
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Photo shown in the "after admission" slot; falls back to the legacy photo.
    pub fn current_photo(&self) -> Option<&str> {
        non_blank(&self.photo_after_admission).or_else(|| non_blank(&self.photo_url))
    }
}

fn non_blank(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.trim().is_empty())
}

/// Replace characters that are unsafe in a `Content-Disposition` filename.
fn sanitize_file_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A resident with its document references resolved to full records.
///
/// The unit of rendering: read-only for the duration of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidentSnapshot {
    pub resident: Resident,
    pub documents: Vec<Document>,
}
