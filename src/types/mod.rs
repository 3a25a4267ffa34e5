pub mod classification;
pub mod identifiers;

pub use classification::{
    CandidateOption, Category, Classification, OracleChoice, OracleRequest, Usage,
};
pub use identifiers::{id_depth, CacheKey, CategoryId, CategoryIdError, ID_PREFIX};
