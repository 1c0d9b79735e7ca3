use crate::options::PagingProfile;

/// Printing and taping guidance for a set of pages cut with `profile`
pub fn assembly_instructions(profile: &PagingProfile) -> Vec<String> {
    vec![
        format!(
            "Print each segment on {}\" × {}\" paper at 100% scale (no scaling)",
            trim_inches(profile.paper_width_in),
            trim_inches(profile.paper_height_in)
        ),
        "Use the registration marks (crosshairs) at corners for alignment".to_string(),
        "Start with segment 1-1 (top-left) and work row by row".to_string(),
        format!(
            "Overlap segments by {}\" and align registration marks precisely",
            trim_inches(profile.overlap_in)
        ),
        "Use clear tape on the back to join segments".to_string(),
    ]
}

/// Format inches without trailing zeros (8.5, 11, 0.25)
fn trim_inches(value: f64) -> String {
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
