/// Default page size for resident listings.
pub const DEFAULT_LIST_LIMIT: u32 = 50;
/// Upper bound on a single listing page.
pub const MAX_LIST_LIMIT: u32 = 500;

#[derive(Debug, Default, Clone)]
pub struct ResidentFilter {
    /// Case-insensitive substring match on name or registration number.
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ResidentFilter {
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
    }
}
