/// Read-only view of the profile fields that count towards completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileCompletionInput<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub department: Option<&'a str>,
    pub current_year: Option<i32>,
    pub current_cgpa: Option<f64>,
    pub resume_url: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
    pub github_url: Option<&'a str>,
}

pub const CHECKED_FIELDS: u32 = 10;

/// Percentage of the ten checked fields that are filled, always a multiple of 10.
///
/// Text fields count when present and not blank after trimming; year and CGPA
/// count when present.
pub fn completion(profile: &ProfileCompletionInput<'_>) -> u8 {
    let text_fields = [
        profile.first_name,
        profile.last_name,
        profile.email,
        profile.phone,
        profile.department,
        profile.resume_url,
        profile.linkedin_url,
        profile.github_url,
    ];

    let filled_text = text_fields
        .iter()
        .filter(|f| f.is_some_and(|s| !s.trim().is_empty()))
        .count() as u32;
    let filled_other =
        u32::from(profile.current_year.is_some()) + u32::from(profile.current_cgpa.is_some());

    ((filled_text + filled_other) * 100 / CHECKED_FIELDS) as u8
}
