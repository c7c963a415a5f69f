//! Route registration helpers for the actix binaries.

#[cfg(feature = "actix")]
#[doc(hidden)]
pub use actix_web;

/// Expands to a `pub fn routes(cfg: &mut ServiceConfig)` for the current module.
///
/// `route name` registers an attribute-macro handler with `cfg.service`,
/// `module name` delegates to `name::routes`.
///
/// ```ignore
/// macros_utils::routes! {
///     route health_route,
///     module monitors,
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($($kind:ident $name:ident),* $(,)?) => {
        pub fn routes(cfg: &mut $crate::actix_web::web::ServiceConfig) {
            $($crate::routes!(@register cfg, $kind $name);)*
        }
    };
    (@register $cfg:ident, route $name:ident) => {
        $cfg.service($name);
    };
    (@register $cfg:ident, module $name:ident) => {
        $cfg.configure($name::routes);
    };
}
