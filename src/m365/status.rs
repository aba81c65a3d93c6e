use super::{CheckOutput, DkimState, Verdict};

/// Reduce one check's column to a tri-state verdict: present on every
/// resolver, on some, or on none. An empty column is Missing.
pub(crate) fn classify<'a, I>(column: I) -> Verdict
where
    I: IntoIterator<Item = &'a CheckOutput>,
{
    let mut present = 0usize;
    let mut total = 0usize;
    for output in column {
        total += 1;
        if output.is_present() {
            present += 1;
        }
    }

    if present == 0 {
        Verdict::Missing
    } else if present == total {
        Verdict::Verified
    } else {
        Verdict::Partial
    }
}

/// DKIM is a conjunction over the two selector verdicts, not a check of its
/// own: enabled only when both selectors are verified everywhere, off as
/// soon as either is missing everywhere.
pub(crate) fn dkim_state(selector1: Verdict, selector2: Verdict) -> DkimState {
    match (selector1, selector2) {
        (Verdict::Verified, Verdict::Verified) => DkimState::Enabled,
        (Verdict::Missing, _) | (_, Verdict::Missing) => DkimState::NotEnabled,
        _ => DkimState::Partial,
    }
}
