//! Governance tag columns.

use crate::JobResult;
use lakegov_core::{Cell, Frame};
use lakegov_quality::CompiledRule;

/// Adds a `<field>_tag = "PII"` column for every configured sensitive field
/// present in the frame. Fields the frame does not have are skipped.
pub fn add_pii_tags(frame: &mut Frame, sensitive_fields: &[String]) -> JobResult<()> {
    for field in sensitive_fields {
        if frame.column_index(field).is_err() {
            continue;
        }
        frame.add_column(format!("{field}_tag"), |_, _| Cell::Text("PII".to_string()))?;
    }
    Ok(())
}

/// Adds a `<field>_quality_tag` column per rule, `PASS` or `FAIL` per row.
///
/// When several rules target the same field, the last one wins, matching a
/// repeated column rewrite.
pub fn add_quality_tags(frame: &mut Frame, rules: &[CompiledRule]) -> JobResult<()> {
    let mut tags: Vec<(String, Vec<Cell>)> = Vec::new();

    for rule in rules {
        let field = &rule.rule().field;
        let idx = frame.column_index(field)?;
        let cells: Vec<Cell> = frame
            .rows()
            .iter()
            .map(|row| {
                let label = if rule.evaluate(&row[idx]) { "PASS" } else { "FAIL" };
                Cell::Text(label.to_string())
            })
            .collect();

        let name = format!("{field}_quality_tag");
        if let Some(existing) = tags.iter_mut().find(|(n, _)| n == &name) {
            existing.1 = cells;
        } else {
            tags.push((name, cells));
        }
    }

    for (name, cells) in tags {
        frame.add_column(name, |_, i| cells[i].clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakegov_quality::{CompiledRule, QualityRule};

    fn frame() -> Frame {
        let csv = "ssn,gpa\n123-45-6789,3.85\n987-65-4321,4.50\n";
        Frame::from_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_pii_tags_only_for_present_fields() {
        let mut frame = frame();
        add_pii_tags(
            &mut frame,
            &["ssn".to_string(), "not_a_column".to_string()],
        )
        .unwrap();

        assert_eq!(frame.cell(0, "ssn_tag").unwrap(), &Cell::Text("PII".into()));
        assert!(frame.column_index("not_a_column_tag").is_err());
    }

    #[test]
    fn test_quality_tags_per_row() {
        let mut frame = frame();
        let rule = CompiledRule::compile(QualityRule::numeric("gpa", 0.0, 4.0)).unwrap();
        add_quality_tags(&mut frame, &[rule]).unwrap();

        assert_eq!(
            frame.cell(0, "gpa_quality_tag").unwrap(),
            &Cell::Text("PASS".into())
        );
        assert_eq!(
            frame.cell(1, "gpa_quality_tag").unwrap(),
            &Cell::Text("FAIL".into())
        );
    }

    #[test]
    fn test_last_rule_wins_for_repeated_fields() {
        let mut frame = frame();
        let strict = CompiledRule::compile(QualityRule::numeric("gpa", 0.0, 1.0)).unwrap();
        let lax = CompiledRule::compile(QualityRule::numeric("gpa", 0.0, 5.0)).unwrap();
        add_quality_tags(&mut frame, &[strict, lax]).unwrap();

        assert_eq!(
            frame.cell(1, "gpa_quality_tag").unwrap(),
            &Cell::Text("PASS".into())
        );
    }
}
