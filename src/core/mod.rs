/// Role-based action gating
pub mod access;

/// Mapping between stored rows and domain types
pub mod adapters;

/// Clients derived from converted leads
pub mod clients;

/// Commission rate resolution and rule management
pub mod commission;

/// Course operations
pub mod course;

/// Report sheets, xlsx workbook and CSV export
pub mod export;

/// Annual goals and seller quota progress
pub mod goals;

/// Lead pipeline operations
pub mod lead;

/// Derived sales metrics
pub mod metrics;

/// Professor operations
pub mod professor;

/// Seller operations
pub mod seller;

/// Form validation
pub mod validation;
