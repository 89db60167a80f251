//! Tools module containing the tool abstraction and the built-in tools

pub mod function_factory;
pub mod search;
pub mod tool;
pub mod weather;

pub use function_factory::FunctionFactory;
pub use search::TavilySearchTool;
pub use tool::{Tool, ToolRegistry};
pub use weather::{WeatherError, WeatherTool};
