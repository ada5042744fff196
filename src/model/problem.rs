//! The immutable input bundle describing one device-design instance.

use serde::{Deserialize, Serialize};

/// One target image: a brightness percentage (0-100) per sector and window,
/// indexed `[slice][window]`.
pub type Image = Vec<Vec<u8>>;

/// Validation failures for [`Problem::new`]. Malformed input is fatal to
/// the caller and never reaches model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProblemError {
    #[error("pizzas, slices, windows and angle subdivisions must all be at least 1")]
    NonPositiveCount,
    #[error("at least one target image is required")]
    NoImages,
    #[error("image {image} has {got} slices, expected {expected}")]
    SliceCountMismatch {
        image: usize,
        got: usize,
        expected: usize,
    },
    #[error("image {image}, slice {slice} has {got} windows, expected {expected}")]
    WindowCountMismatch {
        image: usize,
        slice: usize,
        got: usize,
        expected: usize,
    },
    #[error("image {image} pixel ({slice}, {window}) is {value}; brightness is 0-100")]
    BrightnessOutOfRange {
        image: usize,
        slice: usize,
        window: usize,
        value: u8,
    },
    #[error(
        "a single-pizza stack has no interface to attenuate light; \
         image {image} pixel ({slice}, {window}) must be 100"
    )]
    SinglePizzaPixel {
        image: usize,
        slice: usize,
        window: usize,
    },
}

/// A device-design instance: the stack geometry, the angular resolution and
/// the target images. Read-only once constructed; every solve builds its
/// variables fresh from it.
///
/// The only way to obtain one is [`Problem::new`] (deserialization routes
/// through it too), so a `Problem` in hand is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pizzas: usize,
    slices: usize,
    windows: usize,
    angle_subdivisions: u32,
    images: Vec<Image>,
}

impl Problem {
    pub fn new(
        pizzas: usize,
        slices: usize,
        windows: usize,
        angle_subdivisions: u32,
        images: Vec<Image>,
    ) -> Result<Self, ProblemError> {
        if pizzas == 0 || slices == 0 || windows == 0 || angle_subdivisions == 0 {
            return Err(ProblemError::NonPositiveCount);
        }
        if images.is_empty() {
            return Err(ProblemError::NoImages);
        }
        for (m, image) in images.iter().enumerate() {
            if image.len() != slices {
                return Err(ProblemError::SliceCountMismatch {
                    image: m,
                    got: image.len(),
                    expected: slices,
                });
            }
            for (j, row) in image.iter().enumerate() {
                if row.len() != windows {
                    return Err(ProblemError::WindowCountMismatch {
                        image: m,
                        slice: j,
                        got: row.len(),
                        expected: windows,
                    });
                }
                for (k, &value) in row.iter().enumerate() {
                    if value > 100 {
                        return Err(ProblemError::BrightnessOutOfRange {
                            image: m,
                            slice: j,
                            window: k,
                            value,
                        });
                    }
                    // With one disk there is no second filter: light passes
                    // at full brightness everywhere.
                    if pizzas == 1 && value != 100 {
                        return Err(ProblemError::SinglePizzaPixel {
                            image: m,
                            slice: j,
                            window: k,
                        });
                    }
                }
            }
        }
        Ok(Self {
            pizzas,
            slices,
            windows,
            angle_subdivisions,
            images,
        })
    }

    /// Number of stacked disks.
    pub fn pizzas(&self) -> usize {
        self.pizzas
    }

    /// Sectors per disk.
    pub fn slices(&self) -> usize {
        self.slices
    }

    /// Filter windows per sector.
    pub fn windows(&self) -> usize {
        self.windows
    }

    /// Equal angular subdivisions of a full rotation the filter angles are
    /// drawn from.
    pub fn angle_subdivisions(&self) -> u32 {
        self.angle_subdivisions
    }

    /// Target images, each `slices × windows`.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Number of target images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

impl<'de> Deserialize<'de> for Problem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            pizzas: usize,
            slices: usize,
            windows: usize,
            angle_subdivisions: u32,
            images: Vec<Image>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Problem::new(
            raw.pizzas,
            raw.slices,
            raw.windows,
            raw.angle_subdivisions,
            raw.images,
        )
        .map_err(serde::de::Error::custom)
    }
}
