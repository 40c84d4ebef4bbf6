// Adapters layer: HTTP clients for the hosted services behind the pipelines.

pub mod firecrawl;
pub mod openrouter;

pub use firecrawl::FirecrawlClient;
pub use openrouter::OpenRouterClient;
