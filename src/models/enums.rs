use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + label + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal : $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Human-readable name used in reports.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(DocumentType {
    IdentityProof => "identity_proof" : "Identity Proof",
    MedicalReport => "medical_report" : "Medical Report",
    Prescription => "prescription" : "Prescription",
    AdmissionForm => "admission_form" : "Admission Form",
    ConsentForm => "consent_form" : "Consent Form",
    Photo => "photo" : "Photo",
    LegalDocument => "legal_document" : "Legal Document",
    Other => "other" : "Other",
});

str_enum!(CareEventType {
    Visit => "visit" : "Doctor Visit",
    Checkup => "checkup" : "Checkup",
    Treatment => "treatment" : "Treatment",
    Medication => "medication" : "Medication",
    Therapy => "therapy" : "Therapy",
    Emergency => "emergency" : "Emergency",
    Note => "note" : "Note",
});

str_enum!(CareEventStatus {
    Scheduled => "scheduled" : "Scheduled",
    Pending => "pending" : "Pending",
    Completed => "completed" : "Completed",
    Cancelled => "cancelled" : "Cancelled",
});

str_enum!(ReportFormat {
    Pdf => "pdf" : "PDF",
    Excel => "excel" : "Excel",
});

str_enum!(ReportTemplate {
    Detailed => "detailed" : "Detailed Report",
    Summary => "summary" : "Summary Report",
    Medical => "medical" : "Medical Report",
    Print => "print" : "Print Report",
});

/// Comma-separated `as_str` values, for "valid values are ..." messages.
pub fn valid_values<T: Copy>(all: &[T], as_str: fn(&T) -> &'static str) -> String {
    all.iter().map(as_str).collect::<Vec<_>>().join(", ")
}
