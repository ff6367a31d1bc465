/// A stage that accepts a stream of samples.
pub trait AudioConsumer<T = i16> {
    fn reset(&mut self);
    fn consume(&mut self, data: &[T]);
}

impl<T, C: AudioConsumer<T> + ?Sized> AudioConsumer<T> for &mut C {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn consume(&mut self, data: &[T]) {
        (**self).consume(data);
    }
}
