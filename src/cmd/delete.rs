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

use crate::collection::Collection;
use crate::error::Fallible;

pub fn delete_card(directory: Option<String>, id: &str) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let id = coll.db.resolve_card_id(id)?;
    coll.db.delete_card(id)?;
    println!("Deleted {id}.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::OutputFormat;
    use crate::cmd::import::import_path;
    use crate::cmd::list::render;
    use crate::helper::create_tmp_collection;
    use crate::helper::create_tmp_directory;
    use crate::types::card_id::CardId;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_invalid_id() -> Fallible<()> {
        let directory = create_tmp_directory()?;
        let result = delete_card(Some(directory.display().to_string()), "nope");
        assert_eq!(
            result.unwrap_err().message(),
            "invalid card id: nope"
        );
        Ok(())
    }

    #[test]
    fn test_unknown_id() -> Fallible<()> {
        let directory = create_tmp_directory()?;
        let id = CardId::derive("a", "b", "c");
        assert!(delete_card(Some(directory.display().to_string()), &id.to_hex()).is_err());
        Ok(())
    }

    #[test]
    fn test_delete_by_listed_id() -> Fallible<()> {
        let directory = create_tmp_collection()?;
        let dir = directory.display().to_string();
        let coll = Collection::new(Some(dir.clone()))?;
        import_path(&coll, &directory, Timestamp::now())?;
        let listing = render(&coll.cards()?, OutputFormat::Text)?;
        let listed_id = listing.split_whitespace().next().unwrap().to_string();
        drop(coll);

        delete_card(Some(dir.clone()), &listed_id)?;

        let coll = Collection::new(Some(dir))?;
        assert_eq!(coll.db.card_count()?, 1);
        assert!(
            coll.cards()?
                .iter()
                .all(|c| !c.id().to_hex().starts_with(&listed_id))
        );
        Ok(())
    }
}
