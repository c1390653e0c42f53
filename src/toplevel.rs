use url::Url;

use crate::identified::Identified;

/// Marker trait for objects found at the top level of an SGM `Document`.
///
/// `TopLevel` objects are not nested inside any other object; subordinate objects (features,
/// locations) are owned directly by their parent instead.
pub trait TopLevel: Identified {
    /// The object's own URI, used as its key in the document's object store.
    fn identity(&self) -> &Url;

    /// URI that defines the namespace portion of URLs for this object and child objects.
    fn has_namespace(&self) -> Url;
}
