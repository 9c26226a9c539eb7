use tokio::sync::Mutex;

use lab_core::model::Theme;
use storage::{PersistentStore, keys};

/// Persisted light/dark preference.
pub struct ThemeService {
    store: PersistentStore,
    theme: Mutex<Theme>,
}

impl ThemeService {
    pub async fn load(store: PersistentStore) -> Self {
        let theme = store.load(keys::THEME, Theme::default()).await;
        Self {
            store,
            theme: Mutex::new(theme),
        }
    }

    pub async fn theme(&self) -> Theme {
        *self.theme.lock().await
    }

    pub async fn set(&self, theme: Theme) {
        let mut current = self.theme.lock().await;
        *current = theme;
        self.store.save(keys::THEME, &theme).await;
    }

    /// Flip between light and dark; returns the new theme.
    pub async fn toggle(&self) -> Theme {
        let mut current = self.theme.lock().await;
        *current = current.toggled();
        self.store.save(keys::THEME, &*current).await;
        *current
    }
}
