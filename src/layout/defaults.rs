//! Built-in layout for the Fine Arts master budget workbook.

use super::address::{FieldAddress, FieldSpec};
use super::schema::SchemaNode;
use super::{CourseSheetLayout, KnownCategory, Layout};

pub const SUMMARY_SHEET: &str = "FA_Summary";
pub const BREAKDOWN_SHEET: &str = "CE_Breakdown";
pub const COURSE_SHEET: &str = "Sheet1";

/// Row of `FA_Summary` holding the fiscal-year labels (FY24, FY25, ...)
pub const FY_HEADER_ROW: u32 = 5;

fn summary(row: u32) -> FieldAddress {
    FieldAddress::fiscal_year(SUMMARY_SHEET, FY_HEADER_ROW, row)
}

fn breakdown(row: u32) -> FieldAddress {
    FieldAddress::cell(BREAKDOWN_SHEET, "Q", row)
}

/// Headcounts sit in column C beside the faculty salary lines
fn headcount(row: u32) -> FieldAddress {
    FieldAddress::cell(SUMMARY_SHEET, "C", row)
}

pub(super) fn master_budget_layout() -> Layout {
    let fields = vec![
        FieldSpec::money("total_budget", summary(117)).mandatory(),
        // Compensation
        FieldSpec::money("total_compensation", summary(47)),
        FieldSpec::money("total_academic", summary(16)),
        FieldSpec::money("standing_faculty", summary(11)),
        FieldSpec::count("standing_faculty_count", headcount(11)),
        FieldSpec::money("other_fulltime_faculty", summary(12)),
        FieldSpec::count("other_fulltime_count", headcount(12)),
        FieldSpec::money("parttime_faculty", summary(13)),
        FieldSpec::count("parttime_count", headcount(13)),
        FieldSpec::money("non_academic", summary(42)),
        // Current expenses
        FieldSpec::money("current_expenses_total", summary(111)),
        FieldSpec::money("graduate_total", summary(112)),
        FieldSpec::money("undergraduate_total", summary(113)),
        FieldSpec::money(
            "chair_expenses",
            FieldAddress::labelled(BREAKDOWN_SHEET, "Q", "B", "Chair Expenses"),
        ),
        FieldSpec::money("chair_fall_pt_fund", breakdown(24)),
        FieldSpec::money("chair_spring_pt_fund", breakdown(25)),
        FieldSpec::money("chair_summer_programs", breakdown(26)),
        FieldSpec::money("course_studio", summary(67)),
        FieldSpec::money("studio_printmaking", breakdown(30)),
        FieldSpec::money("studio_visiting_lectures", breakdown(31)),
        FieldSpec::money("studio_senior_seminar", breakdown(32)),
        FieldSpec::money("studio_photography", breakdown(33)),
        FieldSpec::money("studio_animation", breakdown(34)),
        FieldSpec::money("studio_digital_design", breakdown(35)),
        FieldSpec::money("studio_drawing_painting", breakdown(36)),
        FieldSpec::money("studio_sculpture", breakdown(37)),
        FieldSpec::money("studio_video", breakdown(38)),
        FieldSpec::money("studio_photo_consumables", breakdown(39)),
        FieldSpec::money("department_admin", summary(75)),
        FieldSpec::money("departmental_events", summary(79)),
        FieldSpec::money("events_commencement", breakdown(64)),
        FieldSpec::money("events_engagement", breakdown(65)),
        FieldSpec::money("events_student_prizes", breakdown(66)),
        FieldSpec::money("events_senior_reviews", breakdown(67)),
        FieldSpec::money("events_student_exhibitions", breakdown(68)),
        FieldSpec::money("promotion", summary(99)),
    ];

    let compensation = SchemaNode::category(
        "Compensation",
        Some("total_compensation"),
        vec![
            SchemaNode::category(
                "Academic",
                Some("total_academic"),
                vec![
                    SchemaNode::staffed(
                        "Standing Faculty",
                        "standing_faculty",
                        "standing_faculty_count",
                    ),
                    SchemaNode::staffed(
                        "Other Fulltime Faculty",
                        "other_fulltime_faculty",
                        "other_fulltime_count",
                    ),
                    SchemaNode::staffed("Part-Time Faculty", "parttime_faculty", "parttime_count"),
                ],
            ),
            SchemaNode::item("Non-Academic", "non_academic"),
        ],
    );

    // CE_Breakdown rows 30-39, one per course budget code
    let course_studio = SchemaNode::category(
        "Course/Studio Expenses",
        Some("course_studio"),
        vec![
            SchemaNode::item("Printmaking (0506)", "studio_printmaking"),
            SchemaNode::item("Visiting Lectures (0050)", "studio_visiting_lectures"),
            SchemaNode::item("Senior Seminar (0592)", "studio_senior_seminar"),
            SchemaNode::item("Photography Instructional (0515)", "studio_photography"),
            SchemaNode::item("Animation Instructional (0511)", "studio_animation"),
            SchemaNode::item("Digital Design (0513)", "studio_digital_design"),
            SchemaNode::item("Drawing/Painting Instructional (0505)", "studio_drawing_painting"),
            SchemaNode::item("Sculpture Instructional (0507)", "studio_sculpture"),
            SchemaNode::item("Video Instructional (0509)", "studio_video"),
            SchemaNode::item("Photography Consumables (0569)", "studio_photo_consumables"),
        ],
    );

    let undergraduate = SchemaNode::category(
        "Undergraduate",
        Some("undergraduate_total"),
        vec![
            SchemaNode::category(
                "Chair Expenses",
                Some("chair_expenses"),
                vec![
                    SchemaNode::item("Fall PT Faculty Fund", "chair_fall_pt_fund"),
                    SchemaNode::item("Spring PT Faculty Fund", "chair_spring_pt_fund"),
                    SchemaNode::item("Student Summer Programs", "chair_summer_programs"),
                ],
            ),
            course_studio,
            SchemaNode::item("Department Administrative", "department_admin"),
            SchemaNode::category(
                "Departmental Events",
                Some("departmental_events"),
                vec![
                    SchemaNode::item("Commencement", "events_commencement"),
                    SchemaNode::item("Engagement Events", "events_engagement"),
                    SchemaNode::item("Student Prizes", "events_student_prizes"),
                    SchemaNode::item("Senior Reviews", "events_senior_reviews"),
                    SchemaNode::item("Student Exhibitions", "events_student_exhibitions"),
                ],
            ),
            SchemaNode::item("Promotion of Department", "promotion"),
        ],
    );

    let current_expenses = SchemaNode::category(
        "Current Expenses",
        Some("current_expenses_total"),
        vec![
            SchemaNode::item("Graduate", "graduate_total"),
            undergraduate,
        ],
    );

    let courses = CourseSheetLayout {
        sheet: COURSE_SHEET.to_string(),
        // No header row. A holds the category on the first row of each
        // group, B the course code or a note, C the course title.
        name_column: 1,
        category_column: 0,
        title_column: Some(2),
        first_row: 0,
        categories: vec![
            KnownCategory::new("Printmaking", "0506"),
            KnownCategory::new("Visiting Lectures", "0050"),
            KnownCategory::new("Senior Seminar", "0592"),
            KnownCategory::new("Photography Instructional", "0515"),
            KnownCategory::new("Animation Instructional", "0511"),
            KnownCategory::new("Digital Design", "0513"),
            KnownCategory::new("Drawing/Painting Instructional", "0505"),
            KnownCategory::new("Sculpture Instructional", "0507"),
            KnownCategory::new("Video Instructional", "0509"),
            KnownCategory::new("Photography Consumables", "0569"),
        ],
        note_prefixes: vec!["$".to_string()],
        note_labels: vec!["Photo/Video Equipment Room".to_string()],
    };

    Layout {
        total_field: "total_budget".to_string(),
        fields,
        schema: vec![compensation, current_expenses],
        courses: Some(courses),
    }
}
