use ndarray::Array2;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Normal;

/// Weight initialization strategies for fully connected layers.
///
/// Weight matrices are `(output_size, input_size)`, so fan-in is the column
/// count and fan-out the row count.
#[derive(Debug, Clone, Copy)]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization
    XavierUniform,

    /// Xavier/Glorot normal initialization
    XavierNormal,

    /// He/Kaiming uniform initialization (for ReLU)
    HeUniform,

    /// He/Kaiming normal initialization (for ReLU)
    HeNormal,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// Normal distribution with custom mean and std
    Normal { mean: f32, std: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize a weight matrix of the given `(output_size, input_size)`
    /// shape.
    pub fn initialize_weights(&self, shape: (usize, usize)) -> Array2<f32> {
        let (fan_out, fan_in) = shape;

        match *self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random(shape, Uniform::new(-limit, limit))
            }

            WeightInit::XavierNormal => {
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random(shape, Normal::new(0.0, std).unwrap())
            }

            WeightInit::HeUniform => {
                let limit = (6.0 / fan_in as f32).sqrt();
                Array2::random(shape, Uniform::new(-limit, limit))
            }

            WeightInit::HeNormal => {
                let std = (2.0 / fan_in as f32).sqrt();
                Array2::random(shape, Normal::new(0.0, std).unwrap())
            }

            WeightInit::Uniform { min, max } => {
                Array2::random(shape, Uniform::new(min, max))
            }

            WeightInit::Normal { mean, std } => {
                Array2::random(shape, Normal::new(mean, std).unwrap())
            }

            WeightInit::Zeros => Array2::zeros(shape),
        }
    }

    /// Same as [`initialize_weights`](Self::initialize_weights) but drawn
    /// from a seeded generator, for reproducible experiments.
    pub fn initialize_weights_seeded(&self, shape: (usize, usize), seed: u64) -> Array2<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        let (fan_out, fan_in) = shape;

        match *self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), &mut rng)
            }

            WeightInit::XavierNormal => {
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Normal::new(0.0, std).unwrap(), &mut rng)
            }

            WeightInit::HeUniform => {
                let limit = (6.0 / fan_in as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), &mut rng)
            }

            WeightInit::HeNormal => {
                let std = (2.0 / fan_in as f32).sqrt();
                Array2::random_using(shape, Normal::new(0.0, std).unwrap(), &mut rng)
            }

            WeightInit::Uniform { min, max } => {
                Array2::random_using(shape, Uniform::new(min, max), &mut rng)
            }

            WeightInit::Normal { mean, std } => {
                Array2::random_using(shape, Normal::new(mean, std).unwrap(), &mut rng)
            }

            WeightInit::Zeros => Array2::zeros(shape),
        }
    }
}
