//! Course listing extraction for the Course/Studio detail view.

use crate::excel::Sheet;
use crate::layout::CourseSheetLayout;
use crate::types::{CourseGroup, CourseRecord, CourseSection};
use tracing::debug;

/// Group name for rows whose category tag matches no known category
pub const UNCATEGORIZED: &str = "Uncategorized";

pub struct CourseExtractor<'a> {
    layout: &'a CourseSheetLayout,
}

impl<'a> CourseExtractor<'a> {
    pub fn new(layout: &'a CourseSheetLayout) -> Self {
        Self { layout }
    }

    /// Scan the listing until the first row with an empty course name.
    /// A row with a blank category tag belongs to the category above it.
    /// Groups come out in first-seen order, courses in sheet order.
    pub fn extract(&self, sheet: &Sheet) -> Vec<CourseGroup> {
        let mut groups: Vec<CourseGroup> = Vec::new();
        let last_row = match sheet.last_row() {
            Some(r) => r,
            None => return groups,
        };

        let mut category = UNCATEGORIZED.to_string();
        for row in self.layout.first_row..=last_row {
            let tag = sheet.text(row, self.layout.category_column);
            if !tag.is_empty() {
                category = self
                    .layout
                    .canonical_category(&tag)
                    .unwrap_or(UNCATEGORIZED)
                    .to_string();
            }

            let entry = sheet.text(row, self.layout.name_column);
            if entry.is_empty() {
                debug!(row = row + 1, "course listing ends at blank name");
                break;
            }

            let group = match groups.iter().position(|g| g.category == category) {
                Some(i) => &mut groups[i],
                None => {
                    groups.push(CourseGroup::new(category.clone()));
                    let last = groups.len() - 1;
                    &mut groups[last]
                }
            };

            if self.layout.is_note(&entry) {
                group.notes.push(entry);
            } else {
                let title = self
                    .layout
                    .title_column
                    .map(|c| sheet.text(row, c))
                    .unwrap_or_default();
                group.courses.push(CourseRecord {
                    name: entry,
                    title,
                    category: category.clone(),
                });
            }
        }

        for group in &mut groups {
            group.sections = tally_sections(&group.courses);
        }
        groups
    }
}

pub fn extract_courses(sheet: &Sheet, layout: &CourseSheetLayout) -> Vec<CourseGroup> {
    CourseExtractor::new(layout).extract(sheet)
}

/// Count repeated listings of the same course, keeping first-seen order
fn tally_sections(courses: &[CourseRecord]) -> Vec<CourseSection> {
    let mut sections: Vec<CourseSection> = Vec::new();
    for course in courses {
        match sections.iter_mut().find(|s| s.name == course.name) {
            Some(s) => s.sections += 1,
            None => sections.push(CourseSection {
                name: course.name.clone(),
                sections: 1,
            }),
        }
    }
    sections
}
