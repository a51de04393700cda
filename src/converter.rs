use crate::config::ConverterConfig;
use crate::error::Result;
use crate::header_mapper::HeaderMapper;
use crate::injector::{Injector, put_is, put_str};
use crate::pixel::PixelPacker;
use crate::uid::{UidGenerator, frame_of_reference_uid};
use crate::volume::{Header, Volume};
use crate::window::Window;

use dicom::core::VR;
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;
use rand::Rng;
use rand::rngs::StdRng;
use std::iter::FusedIterator;
use tracing::{debug, info};

/// Converts volumes into sequences of single-frame DICOM records.
///
/// A converter owns the random source for its UIDs and is borrowed
/// mutably by each conversion, so one instance serves one volume at a
/// time.
#[derive(Debug, Clone)]
pub struct Converter<R = StdRng> {
    uids: UidGenerator<R>,
    prototype: InMemDicomObject,
}

impl Default for Converter<StdRng> {
    fn default() -> Self {
        Self::new(&ConverterConfig::default())
    }
}

impl Converter<StdRng> {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            uids: UidGenerator::new(config.uid_root()),
            prototype: InMemDicomObject::new_empty(),
        }
    }
}

impl<R: Rng> Converter<R> {
    /// Converter drawing UID terms from the given random source.
    pub fn with_rng(config: &ConverterConfig, rng: R) -> Self {
        Self {
            uids: UidGenerator::with_rng(config.uid_root(), rng),
            prototype: InMemDicomObject::new_empty(),
        }
    }

    /// Use `prototype` as the starting point of every record.
    ///
    /// Attributes of the prototype survive unless a later stage sets them
    /// unconditionally; rescale attributes it carries are never replaced.
    pub fn with_prototype(mut self, prototype: InMemDicomObject) -> Self {
        self.prototype = prototype;
        self
    }

    /// Start converting a volume.
    ///
    /// The display window is computed here, over the whole volume, before
    /// any record is produced. Records are then built lazily, all slices of
    /// channel 0 first, then those of channel 1 and so on.
    ///
    /// # Errors
    ///
    /// Fails if the voxel range does not give a valid window or a voxel
    /// cannot be read.
    pub fn convert<'a, V>(
        &'a mut self,
        volume: &'a V,
        header: &'a Header,
    ) -> Result<Slices<'a, V, R>>
    where
        V: Volume + ?Sized,
    {
        let window = Window::from_volume(volume)?;
        let study_uid = self.uids.study_uid();
        info!(
            study_uid = %study_uid,
            datatype = %header.datatype,
            channels = volume.channel_count(),
            slices = volume.size_z(),
            window_center = window.center(),
            window_width = window.width(),
            "Converting volume"
        );
        Ok(Slices {
            converter: self,
            volume,
            header,
            window,
            study_uid,
            series_uid: None,
            channel: 0,
            z: 0,
            failed: false,
        })
    }
}

/// Lazy sequence of the records of one volume.
///
/// The first error ends the sequence.
pub struct Slices<'a, V: ?Sized, R> {
    converter: &'a mut Converter<R>,
    volume: &'a V,
    header: &'a Header,
    window: Window,
    study_uid: String,
    series_uid: Option<String>,
    channel: usize,
    z: usize,
    failed: bool,
}

impl<V, R> Slices<'_, V, R>
where
    V: Volume + ?Sized,
    R: Rng,
{
    pub fn study_uid(&self) -> &str {
        &self.study_uid
    }

    pub fn window(&self) -> Window {
        self.window
    }

    fn remaining(&self) -> usize {
        let size_z = self.volume.size_z();
        let channels = self.volume.channel_count();
        if self.failed || self.channel >= channels {
            return 0;
        }
        (channels - self.channel) * size_z - self.z
    }

    fn build_slice(&self, series_uid: &str, instance_uid: &str) -> Result<InMemDicomObject> {
        let (z, channel) = (self.z, self.channel);
        let mut obj = self.converter.prototype.clone();

        PixelPacker::put_pixel_data(&mut obj, self.volume, self.header, z, channel)?;

        put_str(&mut obj, tags::STUDY_INSTANCE_UID, VR::UI, self.study_uid.as_str());
        put_str(&mut obj, tags::SERIES_INSTANCE_UID, VR::UI, series_uid);
        put_str(&mut obj, tags::SOP_INSTANCE_UID, VR::UI, instance_uid);
        put_str(
            &mut obj,
            tags::FRAME_OF_REFERENCE_UID,
            VR::UI,
            frame_of_reference_uid(instance_uid),
        );
        put_is(&mut obj, tags::INSTANCE_NUMBER, z as i64 + 1);

        HeaderMapper::new(self.header).inject(&mut obj);
        self.window.inject(&mut obj);
        Ok(obj)
    }
}

impl<V, R> Iterator for Slices<'_, V, R>
where
    V: Volume + ?Sized,
    R: Rng,
{
    type Item = Result<InMemDicomObject>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }

        let series_uid = match &self.series_uid {
            Some(uid) => uid.clone(),
            None => {
                let uid = self.converter.uids.series_uid(&self.study_uid);
                self.series_uid = Some(uid.clone());
                uid
            }
        };
        let instance_uid = self.converter.uids.instance_uid(&series_uid);

        let result = self.build_slice(&series_uid, &instance_uid);
        match &result {
            Ok(_) => debug!(
                channel = self.channel,
                z = self.z,
                sop_instance_uid = %instance_uid,
                "Built slice"
            ),
            Err(e) => {
                debug!(channel = self.channel, z = self.z, "Aborting conversion: {}", e);
                self.failed = true;
            }
        }

        self.z += 1;
        if self.z == self.volume.size_z() {
            self.z = 0;
            self.channel += 1;
            self.series_uid = None;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl<V, R> FusedIterator for Slices<'_, V, R>
where
    V: Volume + ?Sized,
    R: Rng,
{
}
