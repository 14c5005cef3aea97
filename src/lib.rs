pub mod logging;
pub mod magnolia;
pub mod util;
