//! In-memory stand-ins for the storage and cache collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use error_stack::Report;

use kernel::interface::cache::{DependOnRentalCache, RentalCache};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnRentalQuery, RentalQuery};
use kernel::interface::update::{DependOnRentalModifier, RentalModifier};
use kernel::prelude::entity::{
    DestructRentalDraft, Rental, RentalDraft, RentalId, SelectLimit, SelectOffset, VehicleId,
};
use kernel::KernelError;

#[derive(Default)]
struct Store {
    rentals: Vec<Rental>,
    next_id: i64,
}

/// Counts how transactions ended.
#[derive(Default)]
pub struct Journal {
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl Journal {
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub struct MockDatabase {
    journal: Arc<Journal>,
}

pub struct MockTransaction {
    journal: Arc<Journal>,
}

#[async_trait::async_trait]
impl Transaction for MockTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.journal.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.journal.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MockDatabase {
    type Transaction = MockTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        Ok(MockTransaction {
            journal: self.journal.clone(),
        })
    }
}

#[derive(Clone, Default)]
pub struct MockRentalRepository {
    store: Arc<Mutex<Store>>,
}

impl MockRentalRepository {
    fn with_store<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        let mut store = self.store.lock().expect("store poisoned");
        f(&mut store)
    }
}

#[async_trait::async_trait]
impl RentalQuery for MockRentalRepository {
    type Transaction = MockTransaction;

    async fn find_by_id(
        &self,
        _con: &mut MockTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let rental = self.with_store(|store| {
            store
                .rentals
                .iter()
                .find(|rental| rental.id() == id)
                .cloned()
        });
        tokio::task::yield_now().await;
        Ok(rental)
    }

    async fn find_by_vehicle_id(
        &self,
        _con: &mut MockTransaction,
        vehicle_id: &VehicleId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rentals = self.with_store(|store| {
            store
                .rentals
                .iter()
                .filter(|rental| rental.vehicle_id() == vehicle_id)
                .cloned()
                .collect()
        });
        // Lets concurrent callers interleave between their read and their write.
        tokio::task::yield_now().await;
        Ok(rentals)
    }

    async fn find_all(
        &self,
        _con: &mut MockTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        Ok(self.with_store(|store| {
            store
                .rentals
                .iter()
                .skip(*offset.as_ref() as usize)
                .take(*limit.as_ref() as usize)
                .cloned()
                .collect()
        }))
    }
}

#[async_trait::async_trait]
impl RentalModifier for MockRentalRepository {
    type Transaction = MockTransaction;

    async fn create(
        &self,
        _con: &mut MockTransaction,
        draft: &RentalDraft,
    ) -> error_stack::Result<Rental, KernelError> {
        let DestructRentalDraft {
            vehicle_id,
            customer_id,
            rent_date,
        } = draft.clone().into_destruct();
        self.with_store(|store| {
            let occupied = store
                .rentals
                .iter()
                .any(|rental| rental.vehicle_id() == &vehicle_id && rental.is_open());
            if occupied {
                return Err(Report::new(KernelError::Concurrency));
            }
            store.next_id += 1;
            let rental = Rental::new(
                RentalId::new(store.next_id),
                vehicle_id,
                customer_id,
                rent_date,
                None,
            );
            store.rentals.push(rental.clone());
            Ok(rental)
        })
    }

    async fn update(
        &self,
        _con: &mut MockTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        self.with_store(|store| {
            if let Some(stored) = store.rentals.iter_mut().find(|r| r.id() == rental.id()) {
                *stored = rental.clone();
            }
        });
        Ok(())
    }

    async fn close(
        &self,
        _con: &mut MockTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        self.with_store(|store| {
            match store
                .rentals
                .iter_mut()
                .find(|r| r.id() == rental.id() && r.is_open())
            {
                Some(stored) => {
                    *stored = rental.clone();
                    Ok(())
                }
                None => Err(Report::new(KernelError::Concurrency)),
            }
        })
    }

    async fn delete(
        &self,
        _con: &mut MockTransaction,
        id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        self.with_store(|store| store.rentals.retain(|rental| rental.id() != id));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockRentalCache {
    generation: AtomicU64,
    single: Mutex<HashMap<(u64, RentalId), Rental>>,
    pages: Mutex<HashMap<(u64, i64, i64), Vec<Rental>>>,
    failing: AtomicBool,
}

impl MockRentalCache {
    /// Number of `invalidate` calls so far.
    pub fn invalidations(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// True when nothing is cached under the current generation.
    pub fn is_empty(&self) -> bool {
        let generation = self.invalidations();
        let single = self.single.lock().expect("cache poisoned");
        let pages = self.pages.lock().expect("cache poisoned");
        !single.keys().any(|(g, _)| *g == generation)
            && !pages.keys().any(|(g, _, _)| *g == generation)
    }

    /// Makes every cache call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> error_stack::Result<(), KernelError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Report::new(KernelError::Internal).attach_printable("cache is down"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RentalCache for MockRentalCache {
    async fn generation(&self) -> error_stack::Result<u64, KernelError> {
        self.check()?;
        Ok(self.generation.load(Ordering::SeqCst))
    }

    async fn get(
        &self,
        generation: u64,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        self.check()?;
        let single = self.single.lock().expect("cache poisoned");
        Ok(single.get(&(generation, *id)).cloned())
    }

    async fn put(&self, generation: u64, rental: &Rental) -> error_stack::Result<(), KernelError> {
        self.check()?;
        self.single
            .lock()
            .expect("cache poisoned")
            .insert((generation, *rental.id()), rental.clone());
        Ok(())
    }

    async fn get_all(
        &self,
        generation: u64,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Option<Vec<Rental>>, KernelError> {
        self.check()?;
        let key = (generation, *limit.as_ref(), *offset.as_ref());
        Ok(self.pages.lock().expect("cache poisoned").get(&key).cloned())
    }

    async fn put_all(
        &self,
        generation: u64,
        limit: &SelectLimit,
        offset: &SelectOffset,
        rentals: &[Rental],
    ) -> error_stack::Result<(), KernelError> {
        self.check()?;
        let key = (generation, *limit.as_ref(), *offset.as_ref());
        self.pages
            .lock()
            .expect("cache poisoned")
            .insert(key, rentals.to_vec());
        Ok(())
    }

    async fn invalidate(&self) -> error_stack::Result<(), KernelError> {
        self.check()?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockModule {
    database: MockDatabase,
    repository: MockRentalRepository,
    cache: MockRentalCache,
}

impl MockModule {
    pub fn cache(&self) -> &MockRentalCache {
        &self.cache
    }

    pub fn journal(&self) -> &Journal {
        &self.database.journal
    }

    pub fn repository(&self) -> &MockRentalRepository {
        &self.repository
    }
}

impl DependOnDatabaseConnection for MockModule {
    type DatabaseConnection = MockDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl DependOnRentalQuery for MockModule {
    type RentalQuery = MockRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &self.repository
    }
}

impl DependOnRentalModifier for MockModule {
    type RentalModifier = MockRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &self.repository
    }
}

impl DependOnRentalCache for MockModule {
    type RentalCache = MockRentalCache;
    fn rental_cache(&self) -> &Self::RentalCache {
        &self.cache
    }
}
