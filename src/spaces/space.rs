use rand::Rng;

/// Common interface of action and observation spaces.
pub trait Space {
    type Element;

    /// Draw a sample from the space using the provided RNG.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element;

    /// Whether the element belongs to the space.
    fn contains(&self, elem: &Self::Element) -> bool;
}
