//! Repository trait definitions.
//!
//! - [`error`]: Error types for repository operations
//! - [`spot`]: Spot records, published as snapshots
//! - [`review`]: Reviews keyed by spot
//! - [`ledger`]: Key-value storage for the offline cache ledger
//!
//! Use [`FullRepository`] as the bound for code that needs both spots and reviews:
//!
//! ```ignore
//! async fn overview<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let spots = repo.snapshot().await?;
//!     let reviews = repo.reviews_for_spot(spots[0].id).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod ledger;
pub mod review;
pub mod spot;

pub use error::{RepositoryError, RepositoryResult};

pub use ledger::LedgerStore;
pub use review::ReviewRepository;
pub use spot::{SpotRepository, SpotSnapshot};

/// Composite trait bound for a store holding both spots and reviews.
pub trait FullRepository: SpotRepository + ReviewRepository {}

// Blanket implementation: any type implementing both traits is a FullRepository
impl<T> FullRepository for T where T: SpotRepository + ReviewRepository {}
