use std::collections::HashSet;

use crate::ids::IdentifierAllocator;
use crate::model::CourseCollection;
use crate::report::{Change, ChangeLog};

/// Keep the first holder of each id, give every later holder a fresh one.
pub fn apply(collection: &mut CourseCollection, log: &mut ChangeLog) -> usize {
    let mut ids = IdentifierAllocator::with_existing(collection.courses.iter().map(|c| c.id.clone()));
    let mut seen: HashSet<String> = HashSet::new();
    let mut changed = 0;

    for course in collection.courses.iter_mut() {
        if seen.insert(course.id.clone()) {
            continue;
        }
        let number = course.course_numbers.first().map(String::as_str).unwrap_or("");
        let new_id = ids.allocate(&course.name, number);
        let old_id = std::mem::replace(&mut course.id, new_id.clone());
        seen.insert(new_id.clone());
        log.record(Change {
            course_id: new_id.clone(),
            course_name: course.name.clone(),
            field: "course_id",
            before: old_id,
            after: new_id,
        });
        changed += 1;
    }
    changed
}
