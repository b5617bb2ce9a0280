//! The comparison controller: one owner for the working list, favorites,
//! saved searches and preferences, with every change mirrored to the store.

use crate::compare::{self, price_per_sqft, Highlights};
use crate::error::{Error, Result};
use crate::models::{
    generate_id, FavoriteSet, MortgageSettings, Property, PropertyDraft, SavedSearch,
};
use crate::mortgage::{PaymentBreakdown, MAX_INTEREST_RATE, MAX_LOAN_TERM_YEARS};
use crate::share::{self, ImportKind};
use crate::sort::{filter_view, sort_properties, MissingValues, SortOrder, View};
use crate::sources::{extract_address_from_url, extract_source_from_url};
use crate::store::{
    load_or_default, save_json, StateStore, FAVORITES_KEY, MORTGAGE_SETTINGS_KEY, PROPERTIES_KEY,
    SAVED_SEARCHES_KEY, SORT_PREFERENCE_KEY,
};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Everything the comparison screen shows
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub properties: Vec<Property>,
    pub favorites: FavoriteSet,
    pub saved_searches: Vec<SavedSearch>,
    pub sort: SortOrder,
    pub mortgage: MortgageSettings,
    pub view: View,
    pub missing_values: MissingValues,
}

/// One line of the sorted comparison
#[derive(Debug, Clone)]
pub struct PropertyRow<'a> {
    pub property: &'a Property,
    pub price_per_sqft: Option<f64>,
    /// Present only while mortgage calculations are enabled
    pub payment: Option<PaymentBreakdown>,
    pub is_best_value: bool,
    pub is_lowest_payment: bool,
    pub is_favorite: bool,
}

/// Result of saving the working list under a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Replaced(String),
}

pub struct Comparison<S: StateStore> {
    state: AppState,
    store: S,
}

impl<S: StateStore> Comparison<S> {
    /// Restore state from the store; unreadable values fall back to defaults
    pub async fn open(store: S) -> Self {
        let properties: Vec<Property> = load_or_default(&store, PROPERTIES_KEY).await;
        let favorites: FavoriteSet = load_or_default(&store, FAVORITES_KEY).await;
        let saved_searches: Vec<SavedSearch> = load_or_default(&store, SAVED_SEARCHES_KEY).await;
        let mut mortgage: MortgageSettings = load_or_default(&store, MORTGAGE_SETTINGS_KEY).await;
        if let Err(e) = validate_mortgage_settings(&mortgage) {
            warn!(error = %e, "Ignoring stored mortgage settings");
            mortgage = MortgageSettings::default();
        }
        let sort = load_sort_preference(&store).await;

        info!(
            properties = properties.len(),
            favorites = favorites.len(),
            saved_searches = saved_searches.len(),
            "Loaded comparison state"
        );

        Self {
            state: AppState {
                properties,
                favorites,
                saved_searches,
                sort,
                mortgage,
                ..AppState::default()
            },
            store,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn property(&self, id: &str) -> Option<&Property> {
        self.state.properties.iter().find(|p| p.id == id)
    }

    pub fn best_value(&self) -> Option<&Property> {
        compare::best_value(&self.state.properties)
    }

    pub fn lowest_monthly_payment(&self) -> Option<&Property> {
        compare::lowest_monthly_payment(&self.state.properties, &self.state.mortgage)
    }

    /// The active view, sorted, with derived figures and highlight flags.
    ///
    /// Highlights are computed over the whole list, not just the view.
    pub fn rows(&self) -> Vec<PropertyRow<'_>> {
        let state = &self.state;
        let highlights = Highlights::compute(&state.properties, &state.mortgage);
        let visible = filter_view(&state.properties, state.view, &state.favorites);

        sort_properties(visible, state.sort, &state.mortgage, state.missing_values)
            .into_iter()
            .map(|property| PropertyRow {
                property,
                price_per_sqft: price_per_sqft(property),
                payment: state.mortgage.breakdown_for(property),
                is_best_value: highlights.is_best_value(&property.id),
                is_lowest_payment: highlights.is_lowest_payment(&property.id),
                is_favorite: state.favorites.contains(&property.id),
            })
            .collect()
    }

    pub async fn add_property(&mut self, draft: PropertyDraft) -> Result<Property> {
        let property = validate_draft(generate_id(), draft)?;
        info!(id = %property.id, address = %property.address, "Adding property");

        self.state.properties.push(property.clone());
        self.persist_properties().await?;
        Ok(property)
    }

    /// Replace a property's attributes, keeping its id
    pub async fn update_property(&mut self, id: &str, draft: PropertyDraft) -> Result<Property> {
        let index = self
            .state
            .properties
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("property {id}")))?;

        let property = validate_draft(id.to_string(), draft)?;
        info!(id, address = %property.address, "Updating property");

        self.state.properties[index] = property.clone();
        self.persist_properties().await?;
        Ok(property)
    }

    pub async fn remove_property(&mut self, id: &str) -> Result<()> {
        if self.property(id).is_none() {
            return Err(Error::NotFound(format!("property {id}")));
        }
        self.remove_selected(&[id.to_string()]).await?;
        Ok(())
    }

    /// Remove every listed property; unknown ids are ignored.
    /// Returns how many properties were removed.
    pub async fn remove_selected(&mut self, ids: &[String]) -> Result<usize> {
        let before = self.state.properties.len();
        self.state.properties.retain(|p| !ids.contains(&p.id));
        let removed = before - self.state.properties.len();

        let mut favorites_changed = false;
        for id in ids {
            favorites_changed |= self.state.favorites.remove(id);
        }

        info!(removed, "Removed properties");

        if removed > 0 {
            self.persist_properties().await?;
        }
        if favorites_changed {
            self.persist_favorites().await?;
        }
        Ok(removed)
    }

    /// Flip the favorite flag; returns whether the property is now a favorite
    pub async fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let address = self
            .property(id)
            .map(|p| p.address.clone())
            .ok_or_else(|| Error::NotFound(format!("property {id}")))?;

        let now_favorite = if self.state.favorites.remove(id) {
            false
        } else {
            self.state.favorites.insert(id)
        };

        info!(id, %address, favorite = now_favorite, "Toggled favorite");
        self.persist_favorites().await?;
        Ok(now_favorite)
    }

    pub async fn set_sort(&mut self, order: SortOrder) -> Result<()> {
        self.state.sort = order;
        self.store
            .set(SORT_PREFERENCE_KEY, &order.to_string())
            .await
    }

    pub fn set_view(&mut self, view: View) {
        self.state.view = view;
    }

    pub fn set_missing_values(&mut self, missing: MissingValues) {
        self.state.missing_values = missing;
    }

    pub async fn set_mortgage_settings(&mut self, settings: MortgageSettings) -> Result<()> {
        validate_mortgage_settings(&settings)?;

        info!(
            enabled = settings.enabled,
            rate = settings.interest_rate,
            down = settings.down_payment_percentage,
            term = settings.loan_term_years,
            "Updated mortgage settings"
        );
        self.state.mortgage = settings;
        save_json(&self.store, MORTGAGE_SETTINGS_KEY, &self.state.mortgage).await
    }

    pub fn find_search(&self, id_or_name: &str) -> Option<&SavedSearch> {
        let key = id_or_name.trim();
        self.state
            .saved_searches
            .iter()
            .find(|s| s.id == key)
            .or_else(|| self.state.saved_searches.iter().find(|s| s.name == key))
    }

    /// Snapshot the working list under `name`.
    ///
    /// A name already in use is refused unless `overwrite` is set, in which
    /// case the existing entry is replaced and moved to the front.
    pub async fn save_search(&mut self, name: &str, overwrite: bool) -> Result<SaveOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation(
                "please enter a name for this search".to_string(),
            ));
        }

        let existing = self
            .state
            .saved_searches
            .iter()
            .position(|s| s.name == name);

        let outcome = match existing {
            Some(_) if !overwrite => return Err(Error::SearchNameTaken(name.to_string())),
            Some(index) => {
                let mut search = self.state.saved_searches.remove(index);
                search.properties = self.state.properties.clone();
                search.saved_at = Utc::now();
                let id = search.id.clone();
                self.state.saved_searches.insert(0, search);
                SaveOutcome::Replaced(id)
            }
            None => {
                let search = SavedSearch::new(name, self.state.properties.clone());
                let id = search.id.clone();
                self.state.saved_searches.insert(0, search);
                SaveOutcome::Created(id)
            }
        };

        info!(name, properties = self.state.properties.len(), ?outcome, "Saved search");
        self.persist_searches().await?;
        Ok(outcome)
    }

    /// Replace the working list with a saved snapshot
    pub async fn load_search(&mut self, id_or_name: &str) -> Result<usize> {
        let properties = self
            .find_search(id_or_name)
            .map(|s| s.properties.clone())
            .ok_or_else(|| Error::NotFound(format!("saved search {id_or_name}")))?;

        let count = properties.len();
        self.state.properties = properties;
        info!(search = id_or_name, properties = count, "Loaded search");

        self.persist_properties().await?;
        Ok(count)
    }

    pub async fn delete_search(&mut self, id_or_name: &str) -> Result<SavedSearch> {
        let id = self
            .find_search(id_or_name)
            .map(|s| s.id.clone())
            .ok_or_else(|| Error::NotFound(format!("saved search {id_or_name}")))?;

        let index = self
            .state
            .saved_searches
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("saved search {id_or_name}")))?;
        let removed = self.state.saved_searches.remove(index);

        info!(name = %removed.name, "Deleted search");
        self.persist_searches().await?;
        Ok(removed)
    }

    /// Add a shared search to the saved list. Searches opened from a share
    /// link also become the working list. State is untouched on failure.
    pub async fn import_search(&mut self, input: &str, kind: ImportKind) -> Result<SavedSearch> {
        let search = share::import_search(input, kind).map_err(|e| {
            warn!(error = %e, "Import failed");
            e
        })?;

        info!(
            name = %search.name,
            properties = search.properties.len(),
            "Imported search"
        );

        self.state.saved_searches.insert(0, search.clone());
        self.persist_searches().await?;

        if kind == ImportKind::SharedLink {
            self.state.properties = search.properties.clone();
            self.persist_properties().await?;
        }

        Ok(search)
    }

    /// Shareable code for a saved search
    pub fn export_search(&self, id_or_name: &str) -> Result<String> {
        let search = self
            .find_search(id_or_name)
            .ok_or_else(|| Error::NotFound(format!("saved search {id_or_name}")))?;
        share::export_code(search)
    }

    /// Pretty JSON file contents for a saved search
    pub fn export_search_json(&self, id_or_name: &str) -> Result<String> {
        let search = self
            .find_search(id_or_name)
            .ok_or_else(|| Error::NotFound(format!("saved search {id_or_name}")))?;
        share::export_json(search)
    }

    async fn persist_properties(&self) -> Result<()> {
        save_json(&self.store, PROPERTIES_KEY, &self.state.properties).await
    }

    async fn persist_favorites(&self) -> Result<()> {
        save_json(&self.store, FAVORITES_KEY, &self.state.favorites).await
    }

    async fn persist_searches(&self) -> Result<()> {
        save_json(&self.store, SAVED_SEARCHES_KEY, &self.state.saved_searches).await
    }
}

/// Sort preference is stored as the bare key, e.g. `price-asc`
async fn load_sort_preference<S: StateStore>(store: &S) -> SortOrder {
    match store.get(SORT_PREFERENCE_KEY).await {
        Ok(Some(raw)) => raw.trim().trim_matches('"').parse().unwrap_or_else(|e| {
            warn!(value = %raw, error = %e, "Ignoring stored sort preference");
            SortOrder::default()
        }),
        Ok(None) => SortOrder::default(),
        Err(e) => {
            warn!(error = %e, "Failed to read sort preference");
            SortOrder::default()
        }
    }
}

fn validate_mortgage_settings(settings: &MortgageSettings) -> Result<()> {
    let rate = settings.interest_rate;
    if !rate.is_finite() || !(0.0..=MAX_INTEREST_RATE).contains(&rate) {
        return Err(Error::Validation(format!(
            "interest rate must be between 0 and {MAX_INTEREST_RATE} percent"
        )));
    }
    if !(0.0..=100.0).contains(&settings.down_payment_percentage) {
        return Err(Error::Validation(
            "down payment must be between 0 and 100 percent".to_string(),
        ));
    }
    if !(1..=MAX_LOAN_TERM_YEARS).contains(&settings.loan_term_years) {
        return Err(Error::Validation(format!(
            "loan term must be between 1 and {MAX_LOAN_TERM_YEARS} years"
        )));
    }
    Ok(())
}

/// Check required fields and fill the source and address from the URL
fn validate_draft(id: String, draft: PropertyDraft) -> Result<Property> {
    let url = draft.url.trim().to_string();
    if url.is_empty() {
        return Err(Error::Validation("listing URL is required".to_string()));
    }

    let address = match draft.address.trim() {
        "" => extract_address_from_url(&url)
            .ok_or_else(|| Error::Validation("address is required".to_string()))?,
        given => given.to_string(),
    };

    if !draft.price.is_finite() || draft.price <= 0.0 {
        return Err(Error::Validation("price must be greater than 0".to_string()));
    }
    if draft.square_feet == 0 {
        return Err(Error::Validation(
            "square feet must be greater than 0".to_string(),
        ));
    }
    if !draft.taxes.is_finite() || draft.taxes < 0.0 {
        return Err(Error::Validation("taxes cannot be negative".to_string()));
    }
    if !draft.bathrooms.is_finite() || draft.bathrooms < 0.0 {
        return Err(Error::Validation("bathrooms cannot be negative".to_string()));
    }

    let source = match draft.source.trim() {
        "" => extract_source_from_url(&url).unwrap_or_else(|| "Unknown".to_string()),
        given => given.to_string(),
    };
    debug!(%url, %source, "Validated property draft");

    Ok(Property {
        id,
        url,
        address,
        price: draft.price,
        square_feet: draft.square_feet,
        taxes: draft.taxes,
        bedrooms: draft.bedrooms,
        bathrooms: draft.bathrooms,
        year_built: draft.year_built.filter(|y| *y != 0),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn draft(url: &str, price: f64, square_feet: u32) -> PropertyDraft {
        PropertyDraft {
            url: url.to_string(),
            price,
            square_feet,
            bedrooms: 3,
            bathrooms: 2.0,
            ..PropertyDraft::default()
        }
    }

    const REDFIN: &str = "https://www.redfin.com/CA/Oakland/123-Main-St-94610/home/1";
    const ZILLOW: &str =
        "https://www.zillow.com/homedetails/9-Elm-St-Albany-NY-12203/55_zpid/";

    async fn with_two() -> (Comparison<MemoryStore>, Property, Property) {
        let mut app = Comparison::open(MemoryStore::new()).await;
        let a = app.add_property(draft(REDFIN, 500_000.0, 2_000)).await.unwrap();
        let b = app.add_property(draft(ZILLOW, 300_000.0, 2_000)).await.unwrap();
        (app, a, b)
    }

    #[tokio::test]
    async fn add_derives_source_and_address() {
        let (app, a, b) = with_two().await;

        assert_eq!(a.source, "Redfin");
        assert_eq!(a.address, "123 Main St, Oakland, CA 94610");
        assert_eq!(b.source, "Zillow");
        assert_eq!(app.state().properties.len(), 2);
    }

    #[tokio::test]
    async fn add_rejects_incomplete_drafts() {
        let mut app = Comparison::open(MemoryStore::new()).await;

        assert!(matches!(
            app.add_property(draft("", 1.0, 1)).await,
            Err(Error::Validation(_))
        ));
        assert!(app.add_property(draft(REDFIN, 0.0, 1_000)).await.is_err());
        assert!(app.add_property(draft(REDFIN, 100.0, 0)).await.is_err());
        // unknown site and no typed address
        assert!(app
            .add_property(draft("https://example.com/listing/1", 100.0, 10))
            .await
            .is_err());

        assert!(app.state().properties.is_empty());
    }

    #[tokio::test]
    async fn unknown_site_source_falls_back() {
        let mut app = Comparison::open(MemoryStore::new()).await;
        let mut d = draft("http://localhost/listing", 100_000.0, 900);
        d.address = "1 Test Rd".to_string();

        let property = app.add_property(d).await.unwrap();
        assert_eq!(property.source, "Unknown");
    }

    #[tokio::test]
    async fn update_keeps_id() {
        let (mut app, a, _) = with_two().await;

        let mut edit = PropertyDraft::from(&a);
        edit.price = 450_000.0;
        let updated = app.update_property(&a.id, edit).await.unwrap();

        assert_eq!(updated.id, a.id);
        assert_eq!(app.property(&a.id).unwrap().price, 450_000.0);
        assert!(app.update_property("missing", PropertyDraft::from(&a)).await.is_err());
    }

    #[tokio::test]
    async fn removal_drops_favorite_flag() {
        let (mut app, a, b) = with_two().await;
        assert!(app.toggle_favorite(&a.id).await.unwrap());

        app.remove_property(&b.id).await.unwrap();
        assert!(app.state().favorites.contains(&a.id));
        assert_eq!(app.state().favorites.len(), 1);

        app.remove_property(&a.id).await.unwrap();
        assert!(app.state().favorites.is_empty());
        assert!(app.remove_property(&a.id).await.is_err());
    }

    #[tokio::test]
    async fn remove_selected_ignores_unknown_ids() {
        let (mut app, a, b) = with_two().await;
        let removed = app
            .remove_selected(&[a.id.clone(), "nope".to_string(), b.id.clone()])
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert!(app.state().properties.is_empty());
    }

    #[tokio::test]
    async fn toggle_favorite_flips() {
        let (mut app, a, _) = with_two().await;

        assert!(app.toggle_favorite(&a.id).await.unwrap());
        assert!(!app.toggle_favorite(&a.id).await.unwrap());
        assert!(matches!(
            app.toggle_favorite("missing").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn name_collision_needs_confirmation() {
        let (mut app, a, _) = with_two().await;

        let first = app.save_search("Bay Area", false).await.unwrap();
        let SaveOutcome::Created(id) = first else {
            panic!("expected a new search");
        };

        app.remove_property(&a.id).await.unwrap();
        let refused = app.save_search("Bay Area", false).await;
        assert!(matches!(refused, Err(Error::SearchNameTaken(_))));
        assert_eq!(app.state().saved_searches.len(), 1);
        assert_eq!(app.state().saved_searches[0].properties.len(), 2);

        let replaced = app.save_search(" Bay Area ", true).await.unwrap();
        assert_eq!(replaced, SaveOutcome::Replaced(id));
        assert_eq!(app.state().saved_searches.len(), 1);
        assert_eq!(app.state().saved_searches[0].properties.len(), 1);

        assert!(app.save_search("   ", false).await.is_err());
    }

    #[tokio::test]
    async fn load_and_delete_by_name_or_id() {
        let (mut app, a, b) = with_two().await;
        app.save_search("Both", false).await.unwrap();
        app.remove_selected(&[a.id.clone(), b.id.clone()]).await.unwrap();

        assert_eq!(app.load_search("Both").await.unwrap(), 2);
        assert_eq!(app.state().properties.len(), 2);

        let id = app.find_search("Both").unwrap().id.clone();
        let deleted = app.delete_search(&id).await.unwrap();
        assert_eq!(deleted.name, "Both");
        assert!(app.load_search("Both").await.is_err());
    }

    #[tokio::test]
    async fn shared_link_import_replaces_working_list() {
        let (mut source, _, _) = with_two().await;
        source.save_search("Weekend", false).await.unwrap();
        let code = source.export_search("Weekend").unwrap();
        let link = format!("https://listiq.app/?shared={code}");

        let mut app = Comparison::open(MemoryStore::new()).await;
        let imported = app.import_search(&link, ImportKind::SharedLink).await.unwrap();

        assert_eq!(imported.name, "Weekend (Shared)");
        assert_eq!(app.state().properties, source.state().properties);
        assert_eq!(app.state().saved_searches.len(), 1);

        let pasted = app.import_search(&code, ImportKind::Code).await.unwrap();
        assert_eq!(pasted.name, "Weekend (Imported)");
        assert_eq!(app.state().saved_searches[0].id, pasted.id);
    }

    #[tokio::test]
    async fn failed_import_leaves_state_unchanged() {
        let (mut app, _, _) = with_two().await;
        let before = app.state().properties.clone();

        assert!(app.import_search("not a code", ImportKind::SharedLink).await.is_err());
        assert_eq!(app.state().properties, before);
        assert!(app.state().saved_searches.is_empty());
    }

    #[tokio::test]
    async fn rows_apply_view_sort_and_highlights() {
        let (mut app, a, b) = with_two().await;
        app.set_mortgage_settings(MortgageSettings {
            enabled: true,
            ..MortgageSettings::default()
        })
        .await
        .unwrap();
        app.set_sort("price-desc".parse().unwrap()).await.unwrap();

        let rows = app.rows();
        assert_eq!(rows[0].property.id, a.id);
        assert!(rows[1].is_best_value);
        assert!(rows[1].is_lowest_payment);
        assert!(rows.iter().all(|r| r.payment.is_some()));

        app.toggle_favorite(&a.id).await.unwrap();
        app.set_view(View::Favorites);
        let rows = app.rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_favorite);
        // highlights still consider the full list
        assert!(!rows[0].is_best_value);
        assert_eq!(app.best_value().unwrap().id, b.id);
    }

    #[tokio::test]
    async fn rejects_invalid_mortgage_settings() {
        let mut app = Comparison::open(MemoryStore::new()).await;
        let bad = [
            MortgageSettings { interest_rate: -1.0, ..MortgageSettings::default() },
            MortgageSettings { down_payment_percentage: 120.0, ..MortgageSettings::default() },
            MortgageSettings { loan_term_years: 0, ..MortgageSettings::default() },
            MortgageSettings { loan_term_years: 400_000_000, ..MortgageSettings::default() },
            MortgageSettings { interest_rate: 1e6, ..MortgageSettings::default() },
            MortgageSettings { interest_rate: f64::NAN, ..MortgageSettings::default() },
        ];

        for settings in bad {
            assert!(app.set_mortgage_settings(settings).await.is_err());
        }
        assert_eq!(app.state().mortgage, MortgageSettings::default());
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let (mut app, a, _) = with_two().await;
        app.toggle_favorite(&a.id).await.unwrap();
        app.save_search("Saved", false).await.unwrap();
        app.set_sort("yearBuilt-desc".parse().unwrap()).await.unwrap();
        app.set_mortgage_settings(MortgageSettings {
            enabled: true,
            interest_rate: 5.25,
            ..MortgageSettings::default()
        })
        .await
        .unwrap();

        let store = app.into_store();
        assert_eq!(
            store.get(SORT_PREFERENCE_KEY).await.unwrap().as_deref(),
            Some("yearBuilt-desc")
        );

        let reopened = Comparison::open(store).await;
        let state = reopened.state();
        assert_eq!(state.properties.len(), 2);
        assert!(state.favorites.contains(&a.id));
        assert_eq!(state.saved_searches.len(), 1);
        assert_eq!(state.sort.to_string(), "yearBuilt-desc");
        assert_eq!(state.mortgage.interest_rate, 5.25);
    }

    #[tokio::test]
    async fn out_of_range_stored_mortgage_settings_are_ignored() {
        let store = MemoryStore::new();
        let stored = MortgageSettings {
            enabled: true,
            loan_term_years: 400_000_000,
            ..MortgageSettings::default()
        };
        save_json(&store, MORTGAGE_SETTINGS_KEY, &stored).await.unwrap();

        let mut app = Comparison::open(store).await;
        assert_eq!(app.state().mortgage, MortgageSettings::default());

        app.set_mortgage_settings(MortgageSettings {
            enabled: true,
            interest_rate: MAX_INTEREST_RATE,
            loan_term_years: MAX_LOAN_TERM_YEARS,
            ..MortgageSettings::default()
        })
        .await
        .unwrap();
        assert_eq!(app.state().mortgage.loan_term_years, MAX_LOAN_TERM_YEARS);
    }

    #[tokio::test]
    async fn bad_sort_preference_falls_back() {
        let store = MemoryStore::new();
        store.set(SORT_PREFERENCE_KEY, "sideways").await.unwrap();

        let app = Comparison::open(store).await;
        assert_eq!(app.state().sort, SortOrder::default());
    }
}
