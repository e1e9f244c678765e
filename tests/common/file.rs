use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

pub fn write_file(file_spec: FileSpec) {
    if let Some(parent) = file_spec.path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }

    std::fs::write(&file_spec.path, &file_spec.content).expect("Failed to write file");
}

pub fn delete_path(path: &Path) {
    if path.is_dir() {
        std::fs::remove_dir_all(path).expect("Failed to remove dir");
    } else {
        std::fs::remove_file(path).expect("Failed to remove file");
    }
}

/// Write `files_count` files with distinct fake names and contents directly under `dir`
pub fn write_generated_files(dir: &Path, files_count: usize) -> Vec<FileSpec> {
    use fake::{
        Fake,
        faker::lorem::en::{Word, Words},
    };

    (0..files_count)
        .map(|i| {
            let file_name = format!("{}_{i}.txt", Word().fake::<String>());
            let content = format!("{i}: {}\n", Words(5..10).fake::<Vec<String>>().join(" "));
            let file_spec = FileSpec::new(dir.join(file_name), content);
            write_file(file_spec.clone());
            file_spec
        })
        .collect()
}
