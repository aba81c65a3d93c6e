use super::{CheckName, CheckOutput, Discrepancy, ResultMatrix, ValueGroup};

/// Group resolvers by normalized output per check and report every check
/// with at least two distinct present values.
///
/// Comparison is strict: ordered sequences with equal content in different
/// order count as distinct values. Absent and failed cells share the empty
/// group; they join the reported grouping once a check is flagged but never
/// trigger the flag on their own, so a single timed-out resolver does not
/// turn an otherwise agreeing column into a discrepancy.
pub(crate) fn detect(matrix: &ResultMatrix, checks: &[CheckName]) -> Vec<Discrepancy> {
    let mut discrepancies = Vec::new();

    for &check in checks {
        let mut groups: Vec<ValueGroup> = Vec::new();
        for (resolver, output) in matrix.column(check) {
            let value = normalize(output);
            match groups.iter_mut().find(|group| group.value == value) {
                Some(group) => group.resolvers.push(resolver.to_string()),
                None => groups.push(ValueGroup {
                    value,
                    resolvers: vec![resolver.to_string()],
                }),
            }
        }

        let present_groups = groups.iter().filter(|group| group.value.is_some()).count();
        if present_groups > 1 {
            discrepancies.push(Discrepancy { check, groups });
        }
    }

    discrepancies
}

/// Canonical comparable form of a cell: scalar values become one-element
/// sequences, absence and failure become the empty sentinel.
fn normalize(output: &CheckOutput) -> Option<Vec<String>> {
    match output {
        CheckOutput::Value(value) => Some(vec![value.clone()]),
        CheckOutput::Values(values) => Some(values.clone()),
        CheckOutput::Absent | CheckOutput::Failed(_) => None,
    }
}
