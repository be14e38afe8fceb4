/// Builds a [`Properties`](crate::Properties) document from `key => value`
/// pairs, in order.
///
/// Keys and values can be any expression convertible into `String`.
///
/// ```rust
/// use propstream::properties;
///
/// let props = properties! {
///     "app.name" => "demo",
///     "app.port" => 8080.to_string(),
/// };
/// assert_eq!(props.get("app.port"), Some("8080"));
/// ```
#[macro_export]
macro_rules! properties {
    () => {
        $crate::Properties::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::Properties::new();
        $(
            props.insert($key, $value);
        )+
        props
    }};
}
