macro_rules! builtins {
    ($($name:literal),+ $(,)?) => {
        /// Names of the templates that ship with the library.
        pub const BUILTIN_NAMES: &[&str] = &[$($name),+];

        /// The source of the built-in template `name`, if there is one.
        pub fn builtin(name: &str) -> Option<&'static str> {
            match name {
                $($name => Some(include_str!(concat!("templates/", $name))),)+
                _ => None,
            }
        }
    };
}

builtins! {
    "base.html",
    "macros.html",
    "category.html",
    "page.html",
    "index.html",
    "faqs.html",
    "guide.html",
    "sitemap.xml",
}
