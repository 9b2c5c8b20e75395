//! Legislative data connectors.

pub mod aggregator;
pub mod camara;
pub mod mock;

pub use aggregator::{
    AggregatorConfig, AttachedProposition, AuthorDetails, AuthorView, DetailsView,
    MainProposition, PropositionAggregator, PropositionItem, PropositionListing,
};
pub use camara::{CamaraConnector, DEFAULT_CAMARA_URL};
pub use mock::{MockBehavior, MockLegislativeConnector};
