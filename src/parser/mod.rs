pub mod fields;
pub mod pathway;
pub mod segment;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{CatalogError, Result};
use crate::ids::IdentifierAllocator;
use crate::model::{CourseCollection, CourseRecord, Pathway};
use crate::report;
use crate::source::SourceDocument;
use crate::store;
use fields::CourseFields;
use segment::{Chunk, Segmenter};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// A course before it has an id.
#[derive(Debug, Clone)]
pub struct Draft {
    pub fields: CourseFields,
    pub pathway: Pathway,
}

impl Draft {
    pub fn into_record(self, id: &str) -> CourseRecord {
        let f = self.fields;
        let mut r = CourseRecord::blank(id, &f.name, self.pathway);
        r.is_graduation_requirement = pathway::is_graduation_requirement(&r.pathway, &f.name);
        r.course_numbers = f.numbers;
        r.grades = f.grades;
        r.credits = f.credits;
        r.credit_type = f.credit_type;
        r.uc_csu_category = f.uc_csu;
        r.term_length = f.term_length;
        r.offered_terms = f.offered_terms;
        r.semester_restriction = f.restriction;
        r.prerequisites_required = f.prereq_required;
        r.prerequisites_recommended = f.prereq_recommended;
        r.is_ap_or_honors_pair = f.is_ap || f.is_honors;
        r.notes = f.notes;
        r
    }
}

/// Two-stage pipeline per chunk: fields, then pathway.
pub fn process_chunk(chunk: &Chunk) -> Option<Draft> {
    let fields = fields::extract(chunk)?;
    let pathway = pathway::classify(&fields.name, &chunk.text);
    Some(Draft { fields, pathway })
}

#[cfg(feature = "rayon")]
fn process_chunks(chunks: &[Chunk]) -> Vec<Option<Draft>> {
    let pb = report::progress_bar(chunks.len());
    let drafts = chunks
        .par_iter()
        .map(|c| {
            let d = process_chunk(c);
            pb.inc(1);
            d
        })
        .collect();
    pb.finish_and_clear();
    drafts
}

#[cfg(not(feature = "rayon"))]
fn process_chunks(chunks: &[Chunk]) -> Vec<Option<Draft>> {
    let pb = report::progress_bar(chunks.len());
    let drafts = chunks
        .iter()
        .map(|c| {
            let d = process_chunk(c);
            pb.inc(1);
            d
        })
        .collect();
    pb.finish_and_clear();
    drafts
}

/// Ids go out in chunk order, after the per-chunk work, so a run is deterministic.
pub fn allocate_ids(drafts: Vec<Draft>, ids: &mut IdentifierAllocator) -> Vec<CourseRecord> {
    drafts
        .into_iter()
        .map(|d| {
            let number = d.fields.numbers.first().cloned().unwrap_or_default();
            let id = ids.allocate(&d.fields.name, &number);
            d.into_record(&id)
        })
        .collect()
}

/// Segment the text, then extract, classify and number every chunk.
pub fn extract_courses(text: &str, settings: &Settings) -> Result<Vec<CourseRecord>> {
    let segmenter = Segmenter::new(settings.min_chunks, settings.min_chunk_len);
    let seg = segmenter.segment(text);
    info!(strategy = ?seg.strategy, raw = seg.raw_count, kept = seg.chunks.len(), "segmented");
    if seg.chunks.is_empty() {
        return Err(CatalogError::NoChunks {
            chars: text.chars().count(),
        });
    }

    let results = process_chunks(&seg.chunks);
    let skipped = results.iter().filter(|d| d.is_none()).count();
    if skipped > 0 {
        warn!(skipped, "chunks without a course name");
    }
    let drafts: Vec<Draft> = results.into_iter().flatten().collect();
    if drafts.is_empty() {
        return Err(CatalogError::NoCourses {
            chunks: seg.chunks.len(),
        });
    }

    let mut ids = IdentifierAllocator::new();
    Ok(allocate_ids(drafts, &mut ids))
}

/// The extraction job: source document in, fresh collection stored.
pub fn extract_job(settings: &Settings) -> Result<CourseCollection> {
    let text = SourceDocument::from_path(&settings.source_path).read_text()?;
    println!("Read {} characters from {:?}", text.chars().count(), settings.source_path);

    let courses = extract_courses(&text, settings)?;
    let mut collection = CourseCollection::new(&settings.generated_for, &settings.schema_version, courses);
    store::store(&settings.collection_path, &mut collection)?;

    let ap = collection.courses.iter().filter(|c| c.name.starts_with("AP ")).count();
    let honors = collection
        .courses
        .iter()
        .filter(|c| c.name.to_uppercase().contains("HONORS"))
        .count();
    println!(
        "Saved {} courses to {:?} ({} AP, {} honors)",
        collection.courses.len(),
        settings.collection_path,
        ap,
        honors
    );
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreditType, SemesterRestriction, Term, TermLength};

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/catalog_excerpt.txt").unwrap()
    }

    #[test]
    fn fixture_extracts_every_course_in_order() {
        let courses = extract_courses(&fixture(), &Settings::default()).unwrap();
        let ids: Vec<_> = courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "HIGH_SCHOOL_0015",
                "INTEGRATED_MATH_0022",
                "AP_BIOLOGY_0015",
                "SPANISH_34_0004",
                "SPANISH_34_0004_0001",
                "CERAMICS_12_0011",
                "ACADEMIC_TUTOR_0090",
                "JOURNALISM_12_0077",
                "DRAMA_12_0013",
                "LENGLISH_34_0055",
                "DIGITAL_PHOTOGRAPHY_0011",
                "PROBABILITY_WORKSHOP_0022",
            ]
        );
    }

    #[test]
    fn fixture_pathways_use_the_extraction_vocabulary() {
        let courses = extract_courses(&fixture(), &Settings::default()).unwrap();
        let pathways: Vec<_> = courses.iter().map(|c| c.pathway.label()).collect();
        assert_eq!(
            pathways,
            vec![
                "English",
                "Mathematics",
                "Science - Biological",
                "World Language",
                "World Language",
                "Visual & Performing Arts",
                "Elective",
                "English",
                "English",
                "English",
                "Elective",
                "Mathematics",
            ]
        );
    }

    #[test]
    fn fixture_field_details() {
        let courses = extract_courses(&fixture(), &Settings::default()).unwrap();
        let by_id = |id: &str| courses.iter().find(|c| c.id == id).unwrap();

        let english = by_id("HIGH_SCHOOL_0015");
        assert!(english.is_graduation_requirement);
        assert_eq!(english.grades.iter().copied().collect::<Vec<_>>(), vec![9]);
        assert!(english.prerequisites_required.is_empty());

        let math = by_id("INTEGRATED_MATH_0022");
        assert_eq!(math.course_numbers, vec!["002201", "002202"]);
        assert_eq!(math.prerequisites_recommended, vec!["Math 8 with a C or better"]);

        let bio = by_id("AP_BIOLOGY_0015");
        assert!(bio.is_ap_or_honors_pair);
        assert_eq!(bio.prerequisites_recommended.len(), 1);
        assert!(bio.prerequisites_required.is_empty());

        let spanish = by_id("SPANISH_34_0004");
        assert_eq!(spanish.term_length, TermLength::Yearlong);
        assert_eq!(spanish.credits, 10.0);

        let tutor = by_id("ACADEMIC_TUTOR_0090");
        assert_eq!(tutor.uc_csu_category, None);
        assert_eq!(tutor.term_length, TermLength::Semester);
        assert_eq!(tutor.credits, 5.0);

        let photo = by_id("DIGITAL_PHOTOGRAPHY_0011");
        assert_eq!(photo.semester_restriction, Some(SemesterRestriction::FallOnly));
        assert_eq!(photo.offered_terms.iter().copied().collect::<Vec<_>>(), vec![Term::Fall]);

        let workshop = by_id("PROBABILITY_WORKSHOP_0022");
        assert_eq!(workshop.term_length, TermLength::Quarter);
        assert_eq!(workshop.credit_type, CreditType::Partial);

        assert_eq!(by_id("CERAMICS_12_0011").grades.len(), 4);
    }

    #[test]
    fn wrong_document_is_not_the_same_as_no_courses() {
        let settings = Settings::default();
        assert!(matches!(
            extract_courses("   \n\n", &settings),
            Err(CatalogError::NoChunks { .. })
        ));
        assert!(matches!(
            extract_courses("tiny\n\nbits\n", &settings),
            Err(CatalogError::NoChunks { .. })
        ));

        // one anchor chunk survives, but it has no course name
        let single = Settings {
            min_chunks: 1,
            ..Settings::default()
        };
        let nameless = "001501 GRADES: 10, 11, 12 UC/CSU: G\n\
Students explore hand building, wheel throwing and glazing in clay.\n";
        assert!(matches!(
            extract_courses(nameless, &single),
            Err(CatalogError::NoCourses { chunks: 1 })
        ));
    }

    #[test]
    fn unrelated_document_reports_no_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("invoice.txt");
        std::fs::write(&source, "Quarterly invoice\n\nTotal due: $40\n").unwrap();
        let settings = Settings {
            source_path: source,
            collection_path: dir.path().join("courses.json"),
            ..Settings::default()
        };
        assert!(matches!(extract_job(&settings), Err(CatalogError::NoChunks { .. })));
        assert!(!settings.collection_path.exists());
    }

    #[test]
    fn extract_job_stores_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("catalog.txt");
        std::fs::write(&source, fixture()).unwrap();
        let settings = Settings {
            source_path: source,
            collection_path: dir.path().join("out/courses.json"),
            ..Settings::default()
        };

        let collection = extract_job(&settings).unwrap();
        assert_eq!(collection.total_courses, Some(12));
        let reloaded = store::load(&settings.collection_path).unwrap();
        assert_eq!(reloaded, collection);
        assert_eq!(reloaded.schema_version, "2025-11-17.v1");
    }

    #[test]
    fn missing_source_aborts_before_anything_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            source_path: dir.path().join("nope.pdf"),
            collection_path: dir.path().join("courses.json"),
            ..Settings::default()
        };
        assert!(matches!(
            extract_job(&settings),
            Err(CatalogError::SourceUnavailable { .. })
        ));
        assert!(!settings.collection_path.exists());
    }
}
