// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each domain area has its own subdirectory with value objects, input DTOs,
// errors, collaborator ports and the service orchestrating them.
//
// This layer knows nothing about concrete collaborator implementations.
//
// ============================================================================

pub mod order_item;
