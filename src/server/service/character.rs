//! Character lookup by name with registration into the refresh list.

use crate::{
    model::character::CharacterSearchDto,
    server::{error::Error, nexon::GameApi, sheets::cache::OcidCache, sheets::TableStore},
};

pub struct CharacterService<'a> {
    store: &'a dyn TableStore,
    game_api: &'a dyn GameApi,
    ocid_cache: &'a OcidCache,
}

impl<'a> CharacterService<'a> {
    pub fn new(
        store: &'a dyn TableStore,
        game_api: &'a dyn GameApi,
        ocid_cache: &'a OcidCache,
    ) -> Self {
        Self {
            store,
            game_api,
            ocid_cache,
        }
    }

    /// Resolves `character_name` to an OCID and adds it to the identifier list if new.
    ///
    /// # Returns
    /// - `Ok(CharacterSearchDto)` - The OCID and whether it was newly registered
    /// - `Err(Error::BadRequest)` - The name is blank
    /// - `Err(Error::NexonError)` - The name is unknown (404) or the lookup failed
    /// - `Err(Error::SheetsError)` - Registering the OCID failed
    pub async fn search(&self, character_name: &str) -> Result<CharacterSearchDto, Error> {
        let character_name = character_name.trim();
        if character_name.is_empty() {
            return Err(Error::BadRequest("Character name is required".to_string()));
        }

        let ocid = self.game_api.get_ocid(character_name).await?;
        let registered = self
            .store
            .add_ocid_if_absent(&ocid, self.ocid_cache)
            .await?;

        tracing::debug!(
            "Resolved character {} to OCID {} (registered: {})",
            character_name,
            ocid,
            registered
        );

        Ok(CharacterSearchDto { ocid, registered })
    }
}
