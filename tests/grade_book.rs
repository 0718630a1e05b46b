use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use gradebook_db::{DB, Grade, RECORDS_TABLE, RecordStore, StoreConfig, Student};

fn init_data() -> Vec<Student> {
    vec![
        Student::new("47526381", "Juan", vec![Grade::new("Programación 1", 6)]),
        Student::new(
            "46193480",
            "María",
            vec![Grade::new("Programación 1", 8), Grade::new("Programación 2", 6)],
        ),
        Student::new("43796248", "Pedro", vec![Grade::new("Base de datos", 5)]),
    ]
}

fn seeded_store() -> Result<(RecordStore, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let store = RecordStore::new(StoreConfig::new(temp_file.path()));
    store.truncate()?;
    for (i, student) in init_data().iter().enumerate() {
        let stored = store
            .insert(student)
            .with_context(|| format!("failed to insert {i}th student {}", student.id))?;
        assert_eq!(&stored, student);
    }
    Ok((store, temp_file))
}

#[test]
fn test_grade_book_scenario() -> Result<()> {
    let (store, _temp_file) = seeded_store()?;
    let init_data = init_data();

    assert_eq!(store.list_all()?, init_data);

    let juan = store
        .find_by_identifier("47526381")?
        .context("Juan was inserted")?;
    assert_eq!(juan, init_data[0]);

    store.delete_by_identifier(&juan.id)?;
    let todos = store.list_all()?;
    assert_eq!(todos.as_slice(), &init_data[1..]);

    let mut maria = todos[0].clone();
    maria.grades.push(Grade::new("Base de datos", 8));
    assert_eq!(store.update(&maria)?, maria);

    let todos = store.list_all()?;
    assert_eq!(todos[0], maria);
    // The update only touched María's record.
    assert_eq!(todos[1], init_data[2]);
    Ok(())
}

#[test]
fn test_reopened_store_sees_records() -> Result<()> {
    let (store, temp_file) = seeded_store()?;
    drop(store);

    let store = RecordStore::new(StoreConfig::new(temp_file.path()));
    assert_eq!(store.len()?, 3);
    assert_eq!(
        store.find_by_identifier("43796248")?,
        Some(init_data()[2].clone())
    );
    Ok(())
}

#[test]
fn test_on_disk_layout() -> Result<()> {
    let (_store, temp_file) = seeded_store()?;

    let db = DB::open(temp_file.path())?;
    assert_eq!(db.tables()?, vec![RECORDS_TABLE]);
    let docs = db.table(RECORDS_TABLE).all()?;
    assert_eq!(
        docs.iter().map(|d| d.id().get()).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(docs[1]["nombre"], "María");
    assert_eq!(docs[1]["notas"][1]["materia"], "Programación 2");
    assert_eq!(docs[1]["notas"][1]["nota"], 6);

    let contents = std::fs::read_to_string(temp_file.path())?;
    assert!(contents.starts_with("{\n    \"estudiantes\": {\n        \"1\": {\n"));
    assert!(contents.contains("\"nombre\": \"María\""));
    Ok(())
}
