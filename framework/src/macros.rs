/// Turns an `async fn` taking a context into a handler function pointer,
/// for use with [`HandlerCatalog`](crate::HandlerCatalog) and the module
/// constructors.
///
/// ```ignore
/// HandlerCatalog::new().command("ping", handler_func!(ping));
/// ```
#[macro_export]
macro_rules! handler_func {
    ($func:path $(,)?) => {
        |ctx| ::std::boxed::Box::pin($func(ctx))
    };
}
