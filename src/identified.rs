/// Base interface implemented by every object that can appear in an SGM document.
///
/// This trait is used to derive (either directly or indirectly) all other SGM objects. It lets
/// objects be uniquely identified using URIs and referenced from within a document.
pub trait Identified {
    /// Intermediate between URI and name property.
    ///
    /// This is equivalent to "displayId" in the underlying graph model.
    ///
    /// Should be composed of only alphanumeric or underscore characters. Must not begin with a
    /// digit.
    ///
    /// # Note
    /// For objects whose URI is a URL, the requirements on URL structure imply that display_id
    /// _must_ be set.
    fn display_id(&self) -> Option<&str>;

    /// Human readable name.
    ///
    /// To be used when visualizing an object. However, if an object lacks a name, then
    /// `display_id` or the URI itself should be rendered.
    fn name(&self) -> Option<&str>;

    /// Thorough text description.
    fn description(&self) -> Option<&str>;
}
