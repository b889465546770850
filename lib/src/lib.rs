#![doc = svgbobdoc::transform!(
//! Building blocks for the Saltaire Guide: a local directory of trades,
//! services and things to do, rendered to static HTML.
//!
//! # Overview
//!
//! Every directory page on the site follows the same pattern. A category
//! declares its listings, which of their flags become badges, which columns go
//! in the comparison table and which schema.org type each listing is. From
//! that one declaration, the page is projected four ways:
//!
//! ```svgbob
//!                      +--------------+
//!                      | CategorySpec |
//!                      +------+-------+
//!                             |
//!                   +---------+---------+
//!                   | DirectoryCategory |
//!                   +---------+---------+
//!                             |
//!   +-------------+-----------+-----+----------------+
//!   |             |                 |                |
//! +-+---------+ +-+------+ +--------+--------+ +-----+-----+
//! | partition | | badges | | ComparisonTable | | JSON-LD   |
//! | featured  | | per    | | one row per     | | ItemList  |
//! | others    | | card   | | listing         | | FAQPage   |
//! +-----------+ +--------+ +-----------------+ +-----------+
//! ```
//!
//! The cards, the table and the structured data are all built from the same
//! listings, so they cannot disagree: every card's anchor is the `#slug`
//! suffix of its `ItemList` URL, and the visible FAQ is exactly the FAQPage.
//! [`DirectoryCategory::verify()`] checks both before a page is written.
//!
//! Alongside categories, a [`Site`] holds markdown [`ContentPage`]s (visitor
//! information, itineraries, legal text) and static assets.
//!
//! ## Rendering
//!
//! 1. Category files and markdown pages are read into a [`Site`].
//! 2. Each category and page is turned into a serializable view.
//! 3. Views are rendered through a templating [`Engine`](templating::Engine).
//! 4. A [`Renderer`] writes everything out, in parallel, with the assets.
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod io;
pub mod listing;
pub mod partition;
pub mod badge;
pub mod table;
pub mod faq;
pub mod howto;
pub mod jsonld;
pub mod category;
pub mod page;
pub mod markdown;
pub mod site;
pub mod view;
pub mod templating;
pub mod renderer;

pub use listing::{Listing, Slug};
pub use partition::{partition, Partition};
pub use badge::BadgeSpec;
pub use table::{Column, ComparisonTable};
pub use faq::Faq;
pub use howto::HowTo;
pub use category::{CategorySpec, DirectoryCategory};
pub use page::ContentPage;
pub use site::{Asset, Site, SiteSettings};
pub use renderer::{render_site, Renderer};

pub use rayon;
pub use log;
