//! Expansion of library questions into schedulable units.

use crate::model::{CompositeQuestion, CompositeUnit, Library, LibraryQuestion, ParentRef, Question};

/// Project every row of a composite question into its own unit.
///
/// The composite is left untouched; each unit carries a copy of its row's
/// counters and a reference back to the parent for persistence.
pub fn decompose(composite: &CompositeQuestion) -> Vec<CompositeUnit> {
    let parent = ParentRef {
        library_id: composite.library_id.clone(),
        question_id: composite.id.clone(),
    };

    composite
        .rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| CompositeUnit {
            parent: parent.clone(),
            row_index,
            prompt: composite.render_prompt(&row.cue),
            answer: row.answer.clone(),
            marks_per_correct_answer: composite.marks_per_correct_answer,
            marks_awarded: row.marks_awarded,
            marks_available: row.marks_available,
            times_asked: row.times_asked,
        })
        .collect()
}

/// Expand one library question into units, in row order.
pub fn units_of(question: &LibraryQuestion) -> Vec<Question> {
    match question {
        LibraryQuestion::Simple(q) => vec![Question::Simple(q.clone())],
        LibraryQuestion::Composite(c) => decompose(c)
            .into_iter()
            .map(Question::CompositeUnit)
            .collect(),
    }
}

/// Expand a whole library into units, preserving library order.
pub fn units(library: &Library) -> Vec<Question> {
    library.questions.iter().flat_map(units_of).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimpleQuestion;

    fn capitals() -> CompositeQuestion {
        let mut q = CompositeQuestion::from_columns(
            "geo",
            "capitals",
            "Capital of [q]?",
            vec!["France".into(), "Japan".into(), "Peru".into()],
            vec!["Paris".into(), "Tokyo".into(), "Lima".into()],
        )
        .unwrap();
        q.marks_per_correct_answer = 2;
        q.rows[1].marks_awarded = 4;
        q.rows[1].marks_available = 6;
        q.rows[1].times_asked = 3;
        q
    }

    #[test]
    fn one_unit_per_row() {
        let units = decompose(&capitals());
        assert_eq!(units.len(), 3);
        assert_eq!(units[2].row_index, 2);
        assert_eq!(units[2].prompt, "Capital of Peru?");
        assert_eq!(units[2].answer, "Lima");
        assert_eq!(units[0].parent.question_id, "capitals");
        assert_eq!(units[0].parent.library_id, "geo");
        assert_eq!(units[0].marks_per_correct_answer, 2);
    }

    #[test]
    fn rows_keep_independent_counters() {
        let units = decompose(&capitals());
        assert_eq!(units[0].times_asked, 0);
        assert_eq!(units[1].times_asked, 3);
        assert_eq!(units[1].marks_awarded, 4);
        assert_eq!(units[2].marks_available, 0);
    }

    #[test]
    fn decomposing_does_not_touch_parent() {
        let parent = capitals();
        let before = parent.clone();
        let _ = decompose(&parent);
        assert_eq!(parent, before);
    }

    #[test]
    fn library_units_preserve_order() {
        let mut lib = Library::new("geo", "Geography");
        lib.push(LibraryQuestion::Simple(SimpleQuestion::new("geo", "first", "p", "a")));
        lib.push(LibraryQuestion::Composite(capitals()));
        lib.push(LibraryQuestion::Simple(SimpleQuestion::new("geo", "last", "p", "a")));

        let keys: Vec<String> = units(&lib).iter().map(Question::key).collect();
        assert_eq!(
            keys,
            vec![
                "geo/first",
                "geo/capitals#0",
                "geo/capitals#1",
                "geo/capitals#2",
                "geo/last",
            ]
        );
    }

    #[test]
    fn empty_composite_contributes_nothing() {
        let empty =
            CompositeQuestion::from_columns("geo", "none", "[q]", vec![], vec![]).unwrap();
        assert!(units_of(&LibraryQuestion::Composite(empty)).is_empty());
    }
}
