// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

#[cfg(test)]
pub enum FeatureDetectorBehaviour {
    None,
    ForceClmulFalse,
}

pub struct FeatureDetector {
    #[cfg(test)]
    behaviour: FeatureDetectorBehaviour,
}

impl FeatureDetector {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            #[cfg(test)]
            behaviour: FeatureDetectorBehaviour::None,
        }
    }

    /// PCLMULQDQ + SSE2 (x86_64 only).
    #[inline(always)]
    pub fn has_clmul(&self) -> bool {
        #[cfg(test)]
        if let FeatureDetectorBehaviour::ForceClmulFalse = self.behaviour {
            return false;
        }

        Self::probe_clmul()
    }

    #[cfg(all(target_arch = "x86_64", not(target_family = "wasm")))]
    #[inline(always)]
    fn probe_clmul() -> bool {
        cpufeatures::new!(clmul_detection, "pclmulqdq", "sse2");
        clmul_detection::get()
    }

    #[cfg(not(all(target_arch = "x86_64", not(target_family = "wasm"))))]
    #[inline(always)]
    fn probe_clmul() -> bool {
        false
    }

    #[cfg(test)]
    pub fn change_behaviour(&mut self, behaviour: FeatureDetectorBehaviour) {
        self.behaviour = behaviour;
    }
}
