// src/common/cache.rs

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::balance::CashBalance;

/// Validade padrão do saldo de caixa em cache (5 minutos).
pub const DEFAULT_BALANCE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Mapa chave -> valor com expiração e invalidação explícita.
///
/// Guarda cópias imutáveis; uma leitura concorrente no máximo vê um valor
/// antigo, nunca um valor corrompido.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    store: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            store: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now())
    }

    pub fn invalidate(&self, key: &K) {
        let mut store = self.store.write().unwrap_or_else(|p| p.into_inner());
        store.remove(key);
    }

    // Versões com relógio explícito (usadas pelos testes)
    pub(crate) fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        {
            let store = self.store.read().unwrap_or_else(|p| p.into_inner());
            match store.get(key) {
                Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expirado: remove para não acumular entradas mortas
        let mut store = self.store.write().unwrap_or_else(|p| p.into_inner());
        if store.get(key).is_some_and(|e| now >= e.expires_at) {
            store.remove(key);
        }
        None
    }

    pub(crate) fn insert_at(&self, key: K, value: V, now: Instant) {
        let mut store = self.store.write().unwrap_or_else(|p| p.into_inner());
        store.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }
}

/// Saldo de caixa por tenant.
pub type BalanceCache = TtlCache<Uuid, CashBalance>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn balance(value: rust_decimal::Decimal) -> CashBalance {
        CashBalance {
            balance: value,
            total_entries: value,
            total_exits: dec!(0),
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn hit_within_ttl_returns_stored_value() {
        let cache = BalanceCache::new(DEFAULT_BALANCE_TTL);
        let tenant = Uuid::new_v4();
        let t0 = Instant::now();

        cache.insert_at(tenant, balance(dec!(100)), t0);

        let hit = cache.get_at(&tenant, t0 + Duration::from_secs(299)).unwrap();
        assert_eq!(hit.balance, dec!(100));
    }

    #[test]
    fn entry_expires_after_ttl() {
        let cache = BalanceCache::new(DEFAULT_BALANCE_TTL);
        let tenant = Uuid::new_v4();
        let t0 = Instant::now();

        cache.insert_at(tenant, balance(dec!(100)), t0);

        assert!(cache.get_at(&tenant, t0 + Duration::from_secs(300)).is_none());
        // Depois de expirar, nem uma leitura "no passado" o encontra
        assert!(cache.get_at(&tenant, t0).is_none());
    }

    #[test]
    fn invalidation_forces_a_miss() {
        let cache = BalanceCache::new(DEFAULT_BALANCE_TTL);
        let tenant = Uuid::new_v4();

        cache.insert(tenant, balance(dec!(100)));
        cache.invalidate(&tenant);

        assert!(cache.get(&tenant).is_none());
    }

    #[test]
    fn tenants_are_isolated() {
        let cache = BalanceCache::new(DEFAULT_BALANCE_TTL);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        cache.insert(a, balance(dec!(10)));
        cache.insert(b, balance(dec!(20)));
        cache.invalidate(&a);

        assert!(cache.get(&a).is_none());
        assert_eq!(cache.get(&b).unwrap().balance, dec!(20));
    }

    #[test]
    fn clones_share_the_same_store() {
        let cache = BalanceCache::new(DEFAULT_BALANCE_TTL);
        let handle = cache.clone();
        let tenant = Uuid::new_v4();

        handle.insert(tenant, balance(dec!(5)));
        assert!(cache.get(&tenant).is_some());

        cache.invalidate(&tenant);
        assert!(handle.get(&tenant).is_none());
    }
}
