// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::create_dir_all;
use std::fs::write;
use std::path::PathBuf;

use tempfile::tempdir;

use crate::error::Fallible;

/// Create an empty directory that outlives the test.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let target: PathBuf = tempdir()?.path().to_path_buf();
    create_dir_all(&target)?;
    Ok(target.canonicalize()?)
}

pub const SAMPLE_DECK: &str = r#"
name = "Biology"

[[cards]]
question = "What is the powerhouse of the cell?"
answer = "The mitochondria."
difficulty = "easy"
tags = ["cells"]

[[cards]]
question = "What does DNA stand for?"
answer = "Deoxyribonucleic acid."
"#;

/// Create a collection directory containing one deck file with two cards,
/// not yet imported.
pub fn create_tmp_collection() -> Fallible<PathBuf> {
    let directory = create_tmp_directory()?;
    write(directory.join("biology.toml"), SAMPLE_DECK)?;
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_collection() -> Fallible<()> {
        let directory = create_tmp_collection()?;
        assert!(directory.join("biology.toml").exists());
        Ok(())
    }
}
