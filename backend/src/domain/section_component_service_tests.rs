//! Tests for the section component service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockExerciseRepository, MockSectionRepository};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 14, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn make_service(
    sections: MockSectionRepository,
    exercises: MockExerciseRepository,
) -> SectionComponentService<MockSectionRepository, MockExerciseRepository> {
    SectionComponentService::new(
        Arc::new(sections),
        Arc::new(exercises),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

fn section_with(count: usize) -> Section {
    let components = (0..count)
        .map(|_| ComponentRef::exercise(&ExerciseId::random()))
        .collect();
    Section::try_from_parts(SectionId::random(), "Fractions", components).expect("valid section")
}

fn exercise_in(section: &SectionId, created: DateTime<Utc>) -> Exercise {
    let draft = ExerciseDraft::new("Halves", "1/2 + 1/2?", vec!["1".into()]).expect("draft");
    Exercise::create(ExerciseId::random(), *section, draft, created)
}

fn attach_request(section_id: SectionId) -> AttachExerciseRequest {
    AttachExerciseRequest {
        section_id,
        title: "Halves".into(),
        question: "1/2 + 1/2?".into(),
        answers: vec!["1".into()],
    }
}

#[fixture]
fn empty_section() -> Section {
    section_with(0)
}

#[rstest]
#[tokio::test]
async fn attach_inserts_then_appends(empty_section: Section) {
    let section_id = *empty_section.id();
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();

    let found = empty_section.clone();
    sections
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    exercises
        .expect_insert()
        .withf(move |e| e.parent_section() == &section_id && e.date_created() == fixture_now())
        .times(1)
        .return_once(|_| Ok(()));
    sections
        .expect_append_component()
        .withf(|_, _, capacity| *capacity == MAX_COMPONENTS)
        .times(1)
        .return_once(move |_, component, _| {
            let mut updated = empty_section;
            updated.push_component(*component).expect("room");
            Ok(AppendOutcome::Appended(updated))
        });

    let attached = make_service(sections, exercises)
        .attach_exercise(attach_request(section_id))
        .await
        .expect("attach succeeds");
    assert_eq!(attached.section.components().len(), 1);
    assert!(attached.section.lists(attached.exercise.id()));
    assert_eq!(attached.exercise.date_updated(), fixture_now());
}

#[rstest]
#[tokio::test]
async fn attach_to_full_section_writes_nothing() {
    let full = section_with(MAX_COMPONENTS);
    let section_id = *full.id();
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();

    sections
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(full)));
    exercises.expect_insert().times(0);
    sections.expect_append_component().times(0);

    let error = make_service(sections, exercises)
        .attach_exercise(attach_request(section_id))
        .await
        .expect_err("capacity exceeded");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.reason_code(), Some("E1101"));
}

#[rstest]
#[tokio::test]
async fn attach_losing_capacity_race_discards_exercise() {
    let almost_full = section_with(MAX_COMPONENTS - 1);
    let section_id = *almost_full.id();
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();

    sections
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(almost_full)));
    exercises.expect_insert().times(1).return_once(|_| Ok(()));
    sections
        .expect_append_component()
        .times(1)
        .return_once(|_, _, _| Ok(AppendOutcome::AtCapacity(section_with(MAX_COMPONENTS))));
    exercises.expect_delete().times(1).return_once(|_| Ok(true));

    let error = make_service(sections, exercises)
        .attach_exercise(attach_request(section_id))
        .await
        .expect_err("capacity exceeded");
    assert_eq!(error.reason_code(), Some("E1101"));
}

#[rstest]
#[tokio::test]
async fn attach_to_vanished_section_discards_exercise(empty_section: Section) {
    let section_id = *empty_section.id();
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();

    sections
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(empty_section)));
    exercises.expect_insert().times(1).return_once(|_| Ok(()));
    sections
        .expect_append_component()
        .times(1)
        .return_once(|_, _, _| Ok(AppendOutcome::SectionMissing));
    exercises.expect_delete().times(1).return_once(|_| Ok(true));

    let error = make_service(sections, exercises)
        .attach_exercise(attach_request(section_id))
        .await
        .expect_err("section gone");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn attach_append_failure_leaves_orphan(empty_section: Section) {
    let section_id = *empty_section.id();
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();

    sections
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(empty_section)));
    exercises.expect_insert().times(1).return_once(|_| Ok(()));
    sections
        .expect_append_component()
        .times(1)
        .return_once(|_, _, _| Err(SectionRepositoryError::connection("reset")));
    exercises.expect_delete().times(0);

    let error = make_service(sections, exercises)
        .attach_exercise(attach_request(section_id))
        .await
        .expect_err("append failed");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn attach_to_unknown_section_is_not_found() {
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();
    sections.expect_find_by_id().times(1).return_once(|_| Ok(None));
    exercises.expect_insert().times(0);

    let error = make_service(sections, exercises)
        .attach_exercise(attach_request(SectionId::random()))
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn detach_removes_reference_then_deletes() {
    let section = SectionId::random();
    let exercise = exercise_in(&section, fixture_now());
    let exercise_id = *exercise.id();
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();
    let mut seq = mockall::Sequence::new();

    exercises
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exercise)));
    sections
        .expect_remove_component()
        .withf(move |id, comp| id == &section && comp == exercise_id.as_uuid())
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _| Ok(RemoveOutcome::Removed(section_with(0))));
    exercises
        .expect_delete()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(true));

    let outcome = make_service(sections, exercises)
        .detach_exercise(&exercise_id)
        .await
        .expect("detach succeeds");
    assert_eq!(outcome, DetachOutcome::Detached);
}

#[rstest]
#[tokio::test]
async fn detach_of_absent_exercise_is_a_no_op() {
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();
    exercises.expect_find_by_id().times(1).return_once(|_| Ok(None));
    sections.expect_remove_component().times(0);
    exercises.expect_delete().times(0);

    let outcome = make_service(sections, exercises)
        .detach_exercise(&ExerciseId::random())
        .await
        .expect("idempotent");
    assert_eq!(outcome, DetachOutcome::AlreadyAbsent);
}

#[rstest]
#[case::section_missing(RemoveOutcome::SectionMissing)]
#[case::not_listed(RemoveOutcome::NotListed(section_with(2)))]
#[tokio::test]
async fn detach_with_drift_warns_and_still_deletes(#[case] removal: RemoveOutcome) {
    let section = SectionId::random();
    let exercise = exercise_in(&section, fixture_now());
    let exercise_id = *exercise.id();
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();

    exercises
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exercise)));
    sections
        .expect_remove_component()
        .times(1)
        .return_once(move |_, _| Ok(removal));
    exercises.expect_delete().times(1).return_once(|_| Ok(true));

    let outcome = make_service(sections, exercises)
        .detach_exercise(&exercise_id)
        .await
        .expect("warning is not a failure");
    let warning = match outcome {
        DetachOutcome::DetachedWithWarning(warning) => warning,
        other => panic!("expected a consistency warning, got {other:?}"),
    };
    assert_eq!(warning.code, ReasonCode::DetachDrift);
    assert_eq!(warning.section_id, section);
}

#[rstest]
#[tokio::test]
async fn update_refreshes_timestamp_and_keeps_parent() {
    let section = SectionId::random();
    let created = fixture_now() - TimeDelta::hours(1);
    let exercise = exercise_in(&section, created);
    let exercise_id = *exercise.id();
    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();

    exercises
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exercise)));
    exercises
        .expect_update()
        .withf(|e| e.title() == "Quarters" && e.date_updated() == fixture_now())
        .times(1)
        .return_once(|_| Ok(true));
    sections.expect_append_component().times(0);
    sections.expect_remove_component().times(0);

    let request = UpdateExerciseRequest {
        title: Some("Quarters".into()),
        ..UpdateExerciseRequest::default()
    };
    let updated = make_service(sections, exercises)
        .update_exercise(&exercise_id, request)
        .await
        .expect("update succeeds");
    assert_eq!(updated.parent_section(), &section);
    assert_eq!(updated.date_created(), created);
    assert_eq!(updated.date_updated(), fixture_now());
}

#[rstest]
#[tokio::test]
async fn update_of_missing_exercise_is_not_found() {
    let mut exercises = MockExerciseRepository::new();
    exercises.expect_find_by_id().times(1).return_once(|_| Ok(None));
    exercises.expect_update().times(0);

    let error = make_service(MockSectionRepository::new(), exercises)
        .update_exercise(&ExerciseId::random(), UpdateExerciseRequest::default())
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_follows_component_order() {
    let section_id = SectionId::random();
    let first = exercise_in(&section_id, fixture_now());
    let second = exercise_in(&section_id, fixture_now());
    let unlisted = exercise_in(&section_id, fixture_now());
    let section = Section::try_from_parts(
        section_id,
        "Fractions",
        vec![
            ComponentRef::exercise(second.id()),
            ComponentRef::exercise(first.id()),
        ],
    )
    .expect("valid section");
    let expected = vec![*second.id(), *first.id()];

    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();
    sections
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(section)));
    exercises
        .expect_find_by_parent()
        .times(1)
        .return_once(move |_| Ok(vec![first, unlisted, second]));

    let listed = make_service(sections, exercises)
        .list_section_exercises(&section_id)
        .await
        .expect("list succeeds");
    let ids: Vec<ExerciseId> = listed.iter().map(|e| *e.id()).collect();
    assert_eq!(ids, expected);
}

#[rstest]
#[tokio::test]
async fn reconcile_drops_dangling_and_old_orphans() {
    let section_id = SectionId::random();
    let listed = exercise_in(&section_id, fixture_now() - TimeDelta::hours(2));
    let old_orphan = exercise_in(&section_id, fixture_now() - TimeDelta::hours(1));
    let fresh_orphan = exercise_in(&section_id, fixture_now() - TimeDelta::minutes(1));
    let dangling = ExerciseId::random();
    let section = Section::try_from_parts(
        section_id,
        "Fractions",
        vec![
            ComponentRef::exercise(listed.id()),
            ComponentRef::exercise(&dangling),
        ],
    )
    .expect("valid section");
    let old_id = *old_orphan.id();
    let fresh_id = *fresh_orphan.id();

    let mut sections = MockSectionRepository::new();
    let mut exercises = MockExerciseRepository::new();
    sections
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(section)));
    exercises
        .expect_find_by_parent()
        .times(1)
        .return_once(move |_| Ok(vec![listed, old_orphan, fresh_orphan]));
    sections
        .expect_remove_component()
        .withf(move |_, comp| comp == dangling.as_uuid())
        .times(1)
        .return_once(|_, _| Ok(RemoveOutcome::Removed(section_with(1))));
    exercises
        .expect_delete()
        .withf(move |id| *id == old_id)
        .times(1)
        .return_once(|_| Ok(true));

    let report = make_service(sections, exercises)
        .reconcile_section(&section_id)
        .await
        .expect("reconcile succeeds");
    assert_eq!(report.removed_references, vec![*dangling.as_uuid()]);
    assert_eq!(report.deleted_orphans, vec![old_id]);
    assert_eq!(report.pending_orphans, vec![fresh_id]);
}

#[rstest]
#[case("   ")]
#[case("")]
#[tokio::test]
async fn create_section_requires_title(#[case] title: &str) {
    let mut sections = MockSectionRepository::new();
    sections.expect_insert().times(0);

    let error = make_service(sections, MockExerciseRepository::new())
        .create_section(title.to_owned())
        .await
        .expect_err("blank title");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}
